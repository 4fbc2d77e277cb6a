// ==========================================
// 生产 OEE 驾驶舱 - 指标引擎
// ==========================================
// 职责: 可用率 / 性能率 / 质量率 / OEE
// 输入: 已筛选的记录集
// 红线: 无状态引擎，所有方法都是纯函数；除零不报错，按 0 计并附带告警
// ==========================================

use crate::domain::kpi::{KpiEvaluation, KpiResult, KpiTotals, MetricWarning, RatioOutcome};
use crate::domain::record::ProductionRecord;
use tracing::warn;

// ==========================================
// MetricEngine - 指标引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricEngine;

impl MetricEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 单项比率
    // ==========================================

    /// 可用率 = 1 - Σ停机 / Σ计划，钳位到 [0, 1]
    ///
    /// Σ计划 = 0 时返回 0 + ZeroPlannedTime
    pub fn compute_availability(&self, records: &[ProductionRecord]) -> RatioOutcome {
        let planned: f64 = records.iter().map(|r| r.planned_minutes).sum();
        let downtime: f64 = records.iter().map(|r| r.downtime_minutes).sum();

        if planned <= 0.0 {
            warn!(records = records.len(), "计划时间合计为 0，可用率按 0 计");
            return RatioOutcome::zero(records.len(), 0, MetricWarning::ZeroPlannedTime);
        }

        let value = (1.0 - downtime / planned).clamp(0.0, 1.0);
        RatioOutcome::ok(value, records.len(), 0)
    }

    /// 性能率 = mean(min(理想节拍 / 实际节拍, 1))，不加权
    ///
    /// 源数据给出性能率的记录直接取该值；
    /// 其余实际节拍 <= 0 的记录排除并计入 skipped
    pub fn compute_performance(&self, records: &[ProductionRecord]) -> RatioOutcome {
        let mut sum = 0.0;
        let mut samples = 0usize;
        let mut skipped = 0usize;

        for record in records {
            match record.performance_sample() {
                Some(value) => {
                    sum += value;
                    samples += 1;
                }
                None => skipped += 1,
            }
        }

        if samples == 0 {
            warn!(skipped, "无有效性能率样本，性能率按 0 计");
            return RatioOutcome::zero(0, skipped, MetricWarning::NoPerformanceSamples);
        }

        RatioOutcome::ok(sum / samples as f64, samples, skipped)
    }

    /// 质量率 = Σ良品 / Σ产出
    ///
    /// Σ产出 = 0 时返回 0 + ZeroProduction
    pub fn compute_quality(&self, records: &[ProductionRecord]) -> RatioOutcome {
        let produced: f64 = records.iter().map(|r| r.units_produced).sum();
        let good: f64 = records.iter().map(|r| r.units_good).sum();

        if produced <= 0.0 {
            warn!(records = records.len(), "产出合计为 0，质量率按 0 计");
            return RatioOutcome::zero(records.len(), 0, MetricWarning::ZeroProduction);
        }

        // 良品 <= 产出由导入校验保证
        let value = (good / produced).clamp(0.0, 1.0);
        RatioOutcome::ok(value, records.len(), 0)
    }

    /// OEE = 可用率 × 性能率 × 质量率（同一记录集）
    pub fn compute_oee(&self, records: &[ProductionRecord]) -> KpiEvaluation {
        let totals = self.totals(records);

        if records.is_empty() {
            warn!("记录集为空，KPI 按 0 计");
            return KpiEvaluation {
                kpi: KpiResult::ZERO,
                totals,
                warnings: vec![MetricWarning::EmptyRecordSet],
            };
        }

        let availability = self.compute_availability(records);
        let performance = self.compute_performance(records);
        let quality = self.compute_quality(records);

        let warnings = [&availability, &performance, &quality]
            .iter()
            .filter_map(|outcome| outcome.warning)
            .collect();

        KpiEvaluation {
            kpi: KpiResult::from_ratios(availability.value, performance.value, quality.value),
            totals,
            warnings,
        }
    }

    /// 单条记录的 KPI（明细曲线用）
    pub fn compute_record(&self, record: &ProductionRecord) -> KpiEvaluation {
        self.compute_oee(std::slice::from_ref(record))
    }

    // ==========================================
    // 支撑汇总量
    // ==========================================

    /// 汇总计划/停机/产出/良品/不良
    pub fn totals(&self, records: &[ProductionRecord]) -> KpiTotals {
        let mut totals = KpiTotals {
            record_count: records.len(),
            ..KpiTotals::default()
        };

        for record in records {
            totals.planned_minutes += record.planned_minutes;
            totals.downtime_minutes += record.downtime_minutes;
            totals.units_produced += record.units_produced;
            totals.units_good += record.units_good;
            totals.units_rejected += record.units_rejected();
            if record.performance_sample().is_some() {
                totals.performance_samples += 1;
            } else {
                totals.performance_skipped += 1;
            }
        }

        totals
    }
}
