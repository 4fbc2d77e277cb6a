// ==========================================
// 生产 OEE 驾驶舱 - 展示层数据契约
// ==========================================
// 职责: 驾驶舱快照、KPI 卡片、下钻视图（serde 序列化给前端/CLI）
// ==========================================

use crate::domain::filter::{FilterCriteria, FilterOptions};
use crate::domain::kpi::{AggregateView, KpiEvaluation, KpiResult, KpiTotals, MetricWarning, TrendPoint};
use crate::domain::types::GroupKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 筛选后无数据时的空态提示
pub const EMPTY_STATE_MESSAGE: &str = "筛选后无数据，请调整筛选条件后重试";

// ==========================================
// KpiCard - KPI 卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub kpi: KpiResult,
    pub totals: KpiTotals,
    /// 停机合计（小时）
    pub downtime_hours: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MetricWarning>,
}

impl From<KpiEvaluation> for KpiCard {
    fn from(eval: KpiEvaluation) -> Self {
        Self {
            kpi: eval.kpi,
            downtime_hours: eval.totals.downtime_hours(),
            totals: eval.totals,
            warnings: eval.warnings,
        }
    }
}

// ==========================================
// DashboardSnapshot - 一次重算的完整输出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// 数据集批次 ID
    pub batch_id: String,
    /// 本次使用的筛选条件
    pub criteria: FilterCriteria,
    /// 筛选后的记录数
    pub record_count: usize,
    /// 总体 KPI
    pub overall: KpiCard,
    /// 机台排名（OEE 降序）
    pub machine_ranking: AggregateView,
    /// 产品/模具排名（OEE 降序）
    pub product_ranking: AggregateView,
    /// 日趋势
    pub daily_trend: Vec<TrendPoint>,
    /// 月趋势
    pub monthly_trend: Vec<TrendPoint>,
    /// 筛选控件可选项
    pub filter_options: FilterOptions,
    /// 原始数据明细: 筛选后逐条记录的 KPI（文件顺序）
    pub records: Vec<RecordKpiPoint>,
    /// 空态提示（筛选后无数据时）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<String>,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

// ==========================================
// 下钻视图（单机台 / 单产品）
// ==========================================

/// 明细曲线上的一个点（一条记录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordKpiPoint {
    pub date: NaiveDate,
    pub machine_id: String,
    pub product_id: String,
    pub row_number: usize,
    pub kpi: KpiResult,
    pub units_produced: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrilldownView {
    pub key: GroupKey,
    pub summary: KpiCard,
    /// 按日期升序的逐条记录 KPI
    pub series: Vec<RecordKpiPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<String>,
}
