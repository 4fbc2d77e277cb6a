// ==========================================
// 生产 OEE 驾驶舱 - 趋势序列
// ==========================================
// 职责: 按日 / 按月输出 (周期, KPI) 序列，周期起始日升序
// 红线: 无记录的周期保留为空档（kpi = None），不省略
// ==========================================

use crate::domain::kpi::{KpiTotals, TrendPoint};
use crate::domain::record::ProductionRecord;
use crate::domain::types::{Granularity, GroupBy, GroupKey, YearMonth};
use crate::engine::aggregation::{group_key, partition};
use crate::engine::metrics::MetricEngine;
use chrono::NaiveDate;
use std::collections::HashMap;

impl MetricEngine {
    /// 趋势序列，覆盖记录集的最早到最晚日期
    ///
    /// 空记录集返回空序列
    pub fn trend(&self, records: &[ProductionRecord], granularity: Granularity) -> Vec<TrendPoint> {
        let from = records.iter().map(|r| r.date).min();
        let to = records.iter().map(|r| r.date).max();

        match (from, to) {
            (Some(from), Some(to)) => self.trend_in_range(records, granularity, from, to),
            _ => Vec::new(),
        }
    }

    /// 趋势序列，覆盖指定日期范围 [from, to]
    ///
    /// 范围外的记录忽略；from > to 时返回空序列
    pub fn trend_in_range(
        &self,
        records: &[ProductionRecord],
        granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<TrendPoint> {
        if from > to {
            return Vec::new();
        }

        let group_by = match granularity {
            Granularity::Day => GroupBy::Day,
            Granularity::Month => GroupBy::Month,
        };

        let in_range: Vec<ProductionRecord> = records
            .iter()
            .filter(|r| r.date >= from && r.date <= to)
            .cloned()
            .collect();
        let mut buckets: HashMap<GroupKey, Vec<ProductionRecord>> =
            partition(&in_range, |r| group_key(group_by, r))
                .into_iter()
                .collect();

        periods(granularity, from, to)
            .into_iter()
            .map(|(period, period_start)| match buckets.remove(&period) {
                Some(members) => {
                    let eval = self.compute_oee(&members);
                    TrendPoint {
                        period,
                        period_start,
                        kpi: Some(eval.kpi),
                        totals: eval.totals,
                    }
                }
                None => TrendPoint {
                    period,
                    period_start,
                    kpi: None,
                    totals: KpiTotals::default(),
                },
            })
            .collect()
    }
}

/// 范围内的全部周期（键, 起始日），升序
pub fn periods(granularity: Granularity, from: NaiveDate, to: NaiveDate) -> Vec<(GroupKey, NaiveDate)> {
    let mut out = Vec::new();
    if from > to {
        return out;
    }

    match granularity {
        Granularity::Day => {
            for day in from.iter_days().take_while(|d| *d <= to) {
                out.push((GroupKey::Day(day), day));
            }
        }
        Granularity::Month => {
            let last = YearMonth::of(to);
            let mut current = YearMonth::of(from);
            while current <= last {
                out.push((GroupKey::Month(current), current.first_day()));
                current = current.succ();
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(date: NaiveDate) -> ProductionRecord {
        ProductionRecord {
            date,
            machine_id: "M1".to_string(),
            product_id: "P1".to_string(),
            planned_minutes: 480.0,
            downtime_minutes: 48.0,
            cycle_time_actual: 10.0,
            cycle_time_ideal: 9.0,
            units_produced: 100.0,
            units_good: 98.0,
            working_days: None,
            performance_ratio: None,
            row_number: 0,
        }
    }

    #[test]
    fn test_daily_trend_keeps_gaps() {
        let records = vec![record(d(2025, 1, 1)), record(d(2025, 1, 4))];
        let points = MetricEngine.trend(&records, Granularity::Day);

        assert_eq!(points.len(), 4);
        assert!(!points[0].is_gap());
        assert!(points[1].is_gap());
        assert!(points[2].is_gap());
        assert!(!points[3].is_gap());
        assert_eq!(points[1].period_start, d(2025, 1, 2));
    }

    #[test]
    fn test_monthly_trend_across_year_boundary() {
        let records = vec![record(d(2024, 11, 15)), record(d(2025, 2, 1))];
        let points = MetricEngine.trend(&records, Granularity::Month);

        let labels: Vec<String> = points.iter().map(|p| p.period.label()).collect();
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert_eq!(points[0].period_start, d(2024, 11, 1));
        assert!(points[1].is_gap());
    }

    #[test]
    fn test_trend_in_range_pads_both_ends() {
        let records = vec![record(d(2025, 1, 3))];
        let points = MetricEngine.trend_in_range(&records, Granularity::Day, d(2025, 1, 1), d(2025, 1, 5));
        assert_eq!(points.len(), 5);
        assert_eq!(points.iter().filter(|p| !p.is_gap()).count(), 1);
    }

    #[test]
    fn test_empty_trend() {
        assert!(MetricEngine.trend(&[], Granularity::Day).is_empty());
    }
}
