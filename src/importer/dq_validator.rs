// ==========================================
// 生产 OEE 驾驶舱 - 数据质量校验器实现
// ==========================================
// 职责: 记录级不变量校验 + DQ 报告生成
// ==========================================

use crate::domain::dataset::{DqLevel, DqReport, DqSummary, DqViolation};
use crate::domain::record::ProductionRecord;
use crate::importer::record_loader_trait::DqValidator as DqValidatorTrait;

#[derive(Debug, Default)]
pub struct DqValidator;

impl DqValidator {
    pub fn new() -> Self {
        Self
    }

    fn violation(
        record: &ProductionRecord,
        level: DqLevel,
        field: &str,
        message: String,
    ) -> DqViolation {
        DqViolation {
            row_number: record.row_number,
            machine_id: Some(record.machine_id.clone()),
            level,
            field: field.to_string(),
            message,
        }
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_record(&self, record: &ProductionRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        // ===== Error: 负数 =====
        let non_negative: [(&str, f64); 7] = [
            ("planned_minutes", record.planned_minutes),
            ("downtime_minutes", record.downtime_minutes),
            ("cycle_time_ideal", record.cycle_time_ideal),
            ("units_produced", record.units_produced),
            ("units_good", record.units_good),
            ("working_days", record.working_days.unwrap_or(0.0)),
            ("performance_ratio", record.performance_ratio.unwrap_or(0.0)),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Error,
                    field,
                    format!("数值为负: {}", value),
                ));
            }
        }

        // ===== Error: 良品 > 产出 =====
        if record.units_good > record.units_produced {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "units_good",
                format!(
                    "良品数 {} 大于产出数 {}",
                    record.units_good, record.units_produced
                ),
            ));
        }

        // ===== Warning: 停机 > 计划 =====
        // 工作天数来源的计划时间在筛选时才确定，此处不校验
        if record.working_days.is_none() && record.downtime_minutes > record.planned_minutes {
            violations.push(Self::violation(
                record,
                DqLevel::Warning,
                "downtime_minutes",
                format!(
                    "停机 {:.1} 分钟超过计划 {:.1} 分钟，可用率将按 0 计",
                    record.downtime_minutes, record.planned_minutes
                ),
            ));
        }

        // ===== Info: 性能率 / 节拍 =====
        if let Some(ratio) = record.performance_ratio {
            if ratio > 1.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Info,
                    "performance_ratio",
                    format!("性能率 {} 大于 1，按 100% 封顶", ratio),
                ));
            }
        } else if record.cycle_time_actual <= 0.0 {
            violations.push(Self::violation(
                record,
                DqLevel::Info,
                "cycle_time_actual",
                format!(
                    "实际节拍 <= 0 ({})，该行不参与性能率计算",
                    record.cycle_time_actual
                ),
            ));
        } else if record.cycle_time_ideal > record.cycle_time_actual {
            violations.push(Self::violation(
                record,
                DqLevel::Info,
                "cycle_time_ideal",
                "理想节拍大于实际节拍，性能率按 100% 封顶".to_string(),
            ));
        }

        violations
    }

    fn generate_dq_report(
        &self,
        batch_id: String,
        total_rows: usize,
        violations: Vec<DqViolation>,
    ) -> DqReport {
        // 被阻断的行数（同一行多条 Error 只计一次）
        let mut blocked_rows: Vec<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .map(|v| v.row_number)
            .collect();
        blocked_rows.sort_unstable();
        blocked_rows.dedup();

        let warning = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count();
        let info = violations
            .iter()
            .filter(|v| v.level == DqLevel::Info)
            .count();

        DqReport {
            batch_id,
            summary: DqSummary {
                total_rows,
                accepted: total_rows.saturating_sub(blocked_rows.len()),
                blocked: blocked_rows.len(),
                warning,
                info,
            },
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> ProductionRecord {
        ProductionRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            machine_id: "M1".to_string(),
            product_id: "P1".to_string(),
            planned_minutes: 480.0,
            downtime_minutes: 60.0,
            cycle_time_actual: 12.0,
            cycle_time_ideal: 10.0,
            units_produced: 100.0,
            units_good: 95.0,
            working_days: None,
            performance_ratio: None,
            row_number: 2,
        }
    }

    #[test]
    fn test_clean_record_has_no_violations() {
        assert!(DqValidator.validate_record(&record()).is_empty());
    }

    #[test]
    fn test_good_above_produced_is_error() {
        let mut r = record();
        r.units_good = 101.0;
        let violations = DqValidator.validate_record(&r);
        assert!(violations
            .iter()
            .any(|v| v.level == DqLevel::Error && v.field == "units_good"));
    }

    #[test]
    fn test_downtime_above_planned_is_warning() {
        let mut r = record();
        r.downtime_minutes = 500.0;
        let violations = DqValidator.validate_record(&r);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Warning);
    }

    #[test]
    fn test_zero_actual_cycle_is_info() {
        let mut r = record();
        r.cycle_time_actual = 0.0;
        let violations = DqValidator.validate_record(&r);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Info);
    }

    #[test]
    fn test_given_ratio_skips_cycle_checks() {
        let mut r = record();
        r.cycle_time_actual = 0.0;
        r.cycle_time_ideal = 0.0;
        r.performance_ratio = Some(0.89);
        assert!(DqValidator.validate_record(&r).is_empty());

        r.performance_ratio = Some(1.2);
        let violations = DqValidator.validate_record(&r);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "performance_ratio");
        assert_eq!(violations[0].level, DqLevel::Info);

        r.performance_ratio = Some(-0.1);
        assert!(DqValidator
            .validate_record(&r)
            .iter()
            .any(|v| v.level == DqLevel::Error && v.field == "performance_ratio"));
    }

    #[test]
    fn test_report_counts_blocked_rows_once() {
        let mut r = record();
        r.units_produced = -1.0;
        r.units_good = -2.0;
        let violations = DqValidator.validate_record(&r);
        let report = DqValidator.generate_dq_report("b1".to_string(), 3, violations);

        assert_eq!(report.summary.blocked, 1);
        assert_eq!(report.summary.accepted, 2);
    }
}
