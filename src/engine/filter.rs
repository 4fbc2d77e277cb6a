// ==========================================
// 生产 OEE 驾驶舱 - 筛选层
// ==========================================
// 职责: 按日期 / 机台 / 产品收窄记录集，并按班制时长解析计划时间
// 红线: 保持输入顺序；空结果合法，交由指标引擎处理
// ==========================================

use crate::domain::filter::{FilterCriteria, FilterOptions};
use crate::domain::record::ProductionRecord;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// 应用筛选条件
    ///
    /// 条件: date ∈ [date_from, date_to]
    ///   且 machine ∈ machine_set（空集 = 全部）
    ///   且 product ∈ product_set（空集 = 全部）
    pub fn apply_filters(
        &self,
        records: &[ProductionRecord],
        criteria: &FilterCriteria,
    ) -> Vec<ProductionRecord> {
        let filtered: Vec<ProductionRecord> = records
            .iter()
            .filter(|r| {
                criteria.accepts_date(r.date)
                    && criteria.accepts_machine(&r.machine_id)
                    && criteria.accepts_product(&r.product_id)
            })
            .map(|r| r.with_planned_hours_per_day(criteria.hours_per_day))
            .collect();

        debug!(
            input = records.len(),
            output = filtered.len(),
            "筛选完成"
        );
        filtered
    }

    /// 筛选控件可选项
    ///
    /// 机台选项只受日期范围约束；产品选项再受已选机台约束
    pub fn filter_options(
        &self,
        records: &[ProductionRecord],
        criteria: &FilterCriteria,
    ) -> FilterOptions {
        let in_range: Vec<&ProductionRecord> = records
            .iter()
            .filter(|r| criteria.accepts_date(r.date))
            .collect();

        let machines: BTreeSet<String> = in_range.iter().map(|r| r.machine_id.clone()).collect();
        let products: BTreeSet<String> = in_range
            .iter()
            .filter(|r| criteria.accepts_machine(&r.machine_id))
            .map(|r| r.product_id.clone())
            .collect();

        FilterOptions {
            machines: machines.into_iter().collect(),
            products: products.into_iter().collect(),
            date_min: records.iter().map(|r| r.date).min(),
            date_max: records.iter().map(|r| r.date).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, machine: &str, product: &str) -> ProductionRecord {
        ProductionRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            machine_id: machine.to_string(),
            product_id: product.to_string(),
            planned_minutes: 480.0,
            downtime_minutes: 0.0,
            cycle_time_actual: 1.0,
            cycle_time_ideal: 1.0,
            units_produced: 1.0,
            units_good: 1.0,
            working_days: None,
            performance_ratio: None,
            row_number: day as usize,
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![record(3, "M1", "P1"), record(1, "M2", "P1"), record(2, "M1", "P2")];
        let criteria = FilterCriteria::new().machines(["M1"]);

        let out = FilterEngine.apply_filters(&records, &criteria);
        let rows: Vec<usize> = out.iter().map(|r| r.row_number).collect();
        assert_eq!(rows, vec![3, 2]);
    }

    #[test]
    fn test_filter_empty_result_is_valid() {
        let records = vec![record(1, "M1", "P1")];
        let criteria = FilterCriteria::new().products(["NOPE"]);
        assert!(FilterEngine.apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_resolves_working_days() {
        let mut r = record(1, "M1", "P1");
        r.working_days = Some(1.5);
        let criteria = FilterCriteria::new().hours_per_day(8.0);

        let out = FilterEngine.apply_filters(&[r], &criteria);
        assert_eq!(out[0].planned_minutes, 720.0);
    }

    #[test]
    fn test_filter_options_products_follow_machines() {
        let records = vec![record(1, "M1", "P1"), record(2, "M2", "P2"), record(3, "M1", "P3")];
        let criteria = FilterCriteria::new().machines(["M1"]);

        let options = FilterEngine.filter_options(&records, &criteria);
        assert_eq!(options.machines, vec!["M1", "M2"]);
        assert_eq!(options.products, vec!["P1", "P3"]);
        assert_eq!(options.date_min, NaiveDate::from_ymd_opt(2025, 1, 1));
    }
}
