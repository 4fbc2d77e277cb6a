// ==========================================
// 筛选层 集成测试
// ==========================================
// 职责: 验证日期/机台/产品筛选、计划时间解析、筛选控件选项
// ==========================================


use oee_dashboard::domain::{CriteriaError, FilterCriteria, MetricWarning};
use oee_dashboard::engine::{FilterEngine, MetricEngine};
use test_helpers::{date, sample_records, RecordBuilder};

#[test]
fn test_default_criteria_keeps_everything_in_order() {
    let records = sample_records();
    let filtered = FilterEngine::new().apply_filters(&records, &FilterCriteria::default());

    assert_eq!(filtered, records);
}

#[test]
fn test_date_range_is_inclusive() {
    let criteria = FilterCriteria::new().date_range(Some(date(2025, 1, 30)), Some(date(2025, 2, 2)));
    let filtered = FilterEngine::new().apply_filters(&sample_records(), &criteria);

    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|r| r.date <= date(2025, 2, 2)));
}

#[test]
fn test_open_ended_range() {
    let criteria = FilterCriteria::new().date_range(Some(date(2025, 2, 3)), None);
    let filtered = FilterEngine::new().apply_filters(&sample_records(), &criteria);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].row_number, 5);
}

#[test]
fn test_machine_and_product_sets() {
    let criteria = FilterCriteria::new().machines(["M1"]).products(["P2"]);
    let filtered = FilterEngine::new().apply_filters(&sample_records(), &criteria);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].machine_id, "M1");
    assert_eq!(filtered[0].product_id, "P2");
}

#[test]
fn test_no_match_yields_empty_set_and_zero_kpi() {
    let criteria = FilterCriteria::new().machines(["M404"]);
    let filtered = FilterEngine::new().apply_filters(&sample_records(), &criteria);
    assert!(filtered.is_empty());

    let eval = MetricEngine::new().compute_oee(&filtered);
    assert_eq!(eval.kpi.oee, 0.0);
    assert!(eval.warnings.contains(&MetricWarning::EmptyRecordSet));
}

#[test]
fn test_working_days_resolved_with_hours_per_day() {
    let records = vec![
        RecordBuilder::new("M1", "P1").working_days(2.0).downtime(0.0).build(),
        RecordBuilder::new("M2", "P1").planned(300.0).build(),
    ];
    let criteria = FilterCriteria::new().hours_per_day(8.0);
    let filtered = FilterEngine::new().apply_filters(&records, &criteria);

    assert_eq!(filtered[0].planned_minutes, 960.0);
    // 已给出分钟数的记录不受影响
    assert_eq!(filtered[1].planned_minutes, 300.0);
    // 源记录保持不变
    assert_eq!(records[0].planned_minutes, 0.0);
}

#[test]
fn test_filter_options_cascade() {
    let records = sample_records();
    let criteria = FilterCriteria::new()
        .date_range(Some(date(2025, 2, 1)), None)
        .machines(["M1"]);
    let options = FilterEngine::new().filter_options(&records, &criteria);

    assert_eq!(options.machines, vec!["M1", "M2"]);
    assert_eq!(options.products, vec!["P2"]);
    assert_eq!(options.date_min, Some(date(2025, 1, 30)));
    assert_eq!(options.date_max, Some(date(2025, 2, 3)));
}

#[test]
fn test_validate_criteria() {
    assert!(FilterCriteria::default().validate().is_ok());

    let inverted = FilterCriteria::new().date_range(Some(date(2025, 2, 1)), Some(date(2025, 1, 1)));
    assert!(matches!(
        inverted.validate(),
        Err(CriteriaError::InvertedDateRange { .. })
    ));

    let hours = FilterCriteria::new().hours_per_day(30.0);
    assert!(matches!(
        hours.validate(),
        Err(CriteriaError::HoursPerDayOutOfRange { .. })
    ));
}
