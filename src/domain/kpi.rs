// ==========================================
// 生产 OEE 驾驶舱 - KPI 结果类型
// ==========================================
// 职责: 指标计算结果、支撑汇总量、分组视图、趋势点
// 约定: 计算出的比率始终是数值（除零时为 0 并附带告警），
//       只有趋势中的空档期使用 None
// ==========================================

use crate::domain::types::{GroupBy, GroupKey, PartitionOrder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// KpiResult - 四项 KPI
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiResult {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl KpiResult {
    pub const ZERO: KpiResult = KpiResult {
        availability: 0.0,
        performance: 0.0,
        quality: 0.0,
        oee: 0.0,
    };

    /// 由三项比率组合出 OEE
    pub fn from_ratios(availability: f64, performance: f64, quality: f64) -> Self {
        Self {
            availability,
            performance,
            quality,
            oee: availability * performance * quality,
        }
    }
}

// ==========================================
// MetricWarning - 指标告警（非致命）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricWarning {
    /// 记录集为空
    EmptyRecordSet,
    /// Σ计划时间 = 0，可用率按 0 计
    ZeroPlannedTime,
    /// Σ产出 = 0，质量率按 0 计
    ZeroProduction,
    /// 无有效节拍样本，性能率按 0 计
    NoPerformanceSamples,
}

impl fmt::Display for MetricWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricWarning::EmptyRecordSet => write!(f, "记录集为空"),
            MetricWarning::ZeroPlannedTime => write!(f, "计划时间合计为 0，可用率按 0 计"),
            MetricWarning::ZeroProduction => write!(f, "产出合计为 0，质量率按 0 计"),
            MetricWarning::NoPerformanceSamples => {
                write!(f, "无有效实际节拍（均 <= 0），性能率按 0 计")
            }
        }
    }
}

// ==========================================
// RatioOutcome - 单项比率计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioOutcome {
    /// 比率值 [0, 1]
    pub value: f64,
    /// 参与计算的记录数
    pub samples: usize,
    /// 被排除的记录数（仅性能率: 无给定性能率且实际节拍 <= 0）
    pub skipped: usize,
    /// 除零等情况的告警
    pub warning: Option<MetricWarning>,
}

impl RatioOutcome {
    pub(crate) fn ok(value: f64, samples: usize, skipped: usize) -> Self {
        Self {
            value,
            samples,
            skipped,
            warning: None,
        }
    }

    pub(crate) fn zero(samples: usize, skipped: usize, warning: MetricWarning) -> Self {
        Self {
            value: 0.0,
            samples,
            skipped,
            warning: Some(warning),
        }
    }
}

// ==========================================
// KpiTotals - 支撑汇总量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiTotals {
    pub record_count: usize,
    pub planned_minutes: f64,
    pub downtime_minutes: f64,
    pub units_produced: f64,
    pub units_good: f64,
    pub units_rejected: f64,
    /// 参与性能率平均的记录数
    pub performance_samples: usize,
    /// 因实际节拍 <= 0 被排除的记录数
    pub performance_skipped: usize,
}

impl KpiTotals {
    pub fn downtime_hours(&self) -> f64 {
        self.downtime_minutes / 60.0
    }

    pub fn planned_hours(&self) -> f64 {
        self.planned_minutes / 60.0
    }
}

// ==========================================
// KpiEvaluation - 一个记录集的完整评估
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiEvaluation {
    pub kpi: KpiResult,
    pub totals: KpiTotals,
    pub warnings: Vec<MetricWarning>,
}

impl KpiEvaluation {
    pub fn is_empty(&self) -> bool {
        self.totals.record_count == 0
    }
}

// ==========================================
// AggregateRow / AggregateView - 分组视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub kpi: KpiResult,
    pub totals: KpiTotals,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MetricWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub group_by: GroupBy,
    pub order: PartitionOrder,
    pub rows: Vec<AggregateRow>,
}

impl AggregateView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    pub fn keys(&self) -> Vec<&GroupKey> {
        self.rows.iter().map(|row| &row.key).collect()
    }

    /// 保留前 n 个分区（排名表截断）
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// 按计划时间加权的可用率
    ///
    /// 各分区停机不超过计划时间时，与不分组计算的可用率一致
    pub fn weighted_availability(&self) -> f64 {
        let planned: f64 = self.rows.iter().map(|r| r.totals.planned_minutes).sum();
        if planned <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .rows
            .iter()
            .map(|r| r.kpi.availability * r.totals.planned_minutes)
            .sum();
        weighted / planned
    }

    /// 按产出加权的质量率
    pub fn weighted_quality(&self) -> f64 {
        let produced: f64 = self.rows.iter().map(|r| r.totals.units_produced).sum();
        if produced <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .rows
            .iter()
            .map(|r| r.kpi.quality * r.totals.units_produced)
            .sum();
        weighted / produced
    }
}

// ==========================================
// TrendPoint - 趋势点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 周期键（Day 或 Month）
    pub period: GroupKey,
    /// 周期起始日
    pub period_start: NaiveDate,
    /// 空档期为 None
    pub kpi: Option<KpiResult>,
    pub totals: KpiTotals,
}

impl TrendPoint {
    pub fn is_gap(&self) -> bool {
        self.kpi.is_none()
    }
}
