// ==========================================
// 指标性质测试 (proptest)
// ==========================================
// 职责: 对任意记录集验证比率边界、OEE 乘积、加权一致性、趋势长度
// ==========================================

use chrono::{Duration, NaiveDate};
use oee_dashboard::domain::{Granularity, GroupBy, PartitionOrder, ProductionRecord};
use oee_dashboard::engine::{periods, MetricEngine};
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = ProductionRecord> {
    (
        0i64..120,
        0usize..4,
        0usize..3,
        1.0f64..1000.0,
        0.0f64..1.0,
        0.0f64..20.0,
        1.0f64..20.0,
        0.0f64..5000.0,
        0.0f64..1.0,
    )
        .prop_map(
            |(offset, m, p, planned, downtime_ratio, actual, ideal, produced, good_ratio)| {
                ProductionRecord {
                    date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap() + Duration::days(offset),
                    machine_id: format!("M{}", m),
                    product_id: format!("P{}", p),
                    planned_minutes: planned,
                    // 停机不超过计划时，加权可用率与总体一致
                    downtime_minutes: planned * downtime_ratio,
                    cycle_time_actual: actual,
                    cycle_time_ideal: ideal,
                    units_produced: produced.floor(),
                    units_good: (produced.floor() * good_ratio).floor(),
                    working_days: None,
                    performance_ratio: None,
                    row_number: 0,
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_ratios_within_unit_interval(records in prop::collection::vec(arb_record(), 0..40)) {
        let eval = MetricEngine::new().compute_oee(&records);
        for value in [eval.kpi.availability, eval.kpi.performance, eval.kpi.quality, eval.kpi.oee] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn prop_quality_is_exact_ratio(records in prop::collection::vec(arb_record(), 1..40)) {
        let engine = MetricEngine::new();
        let totals = engine.totals(&records);
        prop_assume!(totals.units_produced > 0.0);

        let quality = engine.compute_quality(&records);
        prop_assert_eq!(quality.value, totals.units_good / totals.units_produced);
    }

    #[test]
    fn prop_oee_is_product(records in prop::collection::vec(arb_record(), 1..40)) {
        let view = MetricEngine::new().aggregate_by(&records, GroupBy::Machine, PartitionOrder::FirstSeen);
        for row in &view.rows {
            let expected = row.kpi.availability * row.kpi.performance * row.kpi.quality;
            prop_assert!((row.kpi.oee - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_weighted_availability_reconciles(records in prop::collection::vec(arb_record(), 1..40)) {
        let engine = MetricEngine::new();
        let overall = engine.compute_availability(&records).value;
        for group_by in [GroupBy::Machine, GroupBy::Product, GroupBy::Month] {
            let view = engine.aggregate_by(&records, group_by, PartitionOrder::FirstSeen);
            prop_assert!((view.weighted_availability() - overall).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_trend_length_matches_span(records in prop::collection::vec(arb_record(), 1..40)) {
        let engine = MetricEngine::new();
        let from = records.iter().map(|r| r.date).min().unwrap();
        let to = records.iter().map(|r| r.date).max().unwrap();

        let daily = engine.trend(&records, Granularity::Day);
        prop_assert_eq!(daily.len() as i64, (to - from).num_days() + 1);

        let monthly = engine.trend(&records, Granularity::Month);
        prop_assert_eq!(monthly.len(), periods(Granularity::Month, from, to).len());

        let covered: usize = daily.iter().map(|p| p.totals.record_count).sum();
        prop_assert_eq!(covered, records.len());
    }
}
