// ==========================================
// 生产 OEE 驾驶舱 - 列映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射 + 类型转换
// 列名匹配: 去首尾空白、忽略大小写、'_' / '-' 视为空格
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use crate::importer::record_loader_trait::FieldMapper as FieldMapperTrait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

// ==========================================
// 标准列定义
// ==========================================

/// 标准列（含别名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Machine,
    Product,
    PlannedMinutes,
    WorkingDays,
    DowntimeMinutes,
    DowntimeHours,
    CycleTimeActual,
    CycleTimeIdeal,
    PerformanceRatio,
    UnitsProduced,
    UnitsGood,
    UnitsRejected,
}

impl Column {
    const ALL: [Column; 13] = [
        Column::Date,
        Column::Machine,
        Column::Product,
        Column::PlannedMinutes,
        Column::WorkingDays,
        Column::DowntimeMinutes,
        Column::DowntimeHours,
        Column::CycleTimeActual,
        Column::CycleTimeIdeal,
        Column::PerformanceRatio,
        Column::UnitsProduced,
        Column::UnitsGood,
        Column::UnitsRejected,
    ];

    /// 标准列名（用于错误提示）
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Machine => "machine_id",
            Column::Product => "product_id",
            Column::PlannedMinutes => "planned_minutes",
            Column::WorkingDays => "working_days",
            Column::DowntimeMinutes => "downtime_minutes",
            Column::DowntimeHours => "downtime_hours",
            Column::CycleTimeActual => "cycle_time_actual",
            Column::CycleTimeIdeal => "cycle_time_ideal",
            Column::PerformanceRatio => "performance_ratio",
            Column::UnitsProduced => "units_produced",
            Column::UnitsGood => "units_good",
            Column::UnitsRejected => "units_rejected",
        }
    }

    /// 可接受的列名（已规范化）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["date", "production date"],
            Column::Machine => &["machine id", "machine"],
            Column::Product => &["product id", "product", "mold", "mold id", "product/mold"],
            Column::PlannedMinutes => &["planned minutes", "planned time", "planned time min"],
            Column::WorkingDays => &["working days", "planned days"],
            Column::DowntimeMinutes => &["downtime minutes", "downtime min", "downtime mins"],
            // 不带单位的 downtime 按小时计
            Column::DowntimeHours => &["downtime hours", "downtime hrs", "downtime h", "downtime"],
            Column::CycleTimeActual => &["cycle time actual", "actual cycle time"],
            Column::CycleTimeIdeal => &["cycle time ideal", "ideal cycle time"],
            Column::PerformanceRatio => &["performance ratio", "performance %", "performance"],
            Column::UnitsProduced => &[
                "units produced",
                "production per unit",
                "production units",
                "produced units",
            ],
            Column::UnitsGood => &["units good", "good units"],
            Column::UnitsRejected => &["units rejected", "reject per unit", "rejected units", "rejects"],
        }
    }
}

/// 列名规范化
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ==========================================
// 列布局（由表头一次性解析）
// ==========================================

/// 计划时间来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedSource {
    Minutes(String),
    WorkingDays(String),
}

/// 停机时间来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DowntimeSource {
    Minutes(String),
    Hours(String),
}

/// 性能率来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformanceSource {
    /// 实际节拍 + 理想节拍
    CycleTimes { actual: String, ideal: String },
    /// 直接给出的性能率（0.89 或 89%）
    Ratio(String),
}

/// 良品数来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoodSource {
    Good(String),
    /// 良品 = 产出 - 不良
    Rejected(String),
}

/// 列布局: 每个标准字段对应的源列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: String,
    pub machine: String,
    pub product: String,
    pub planned: PlannedSource,
    pub downtime: DowntimeSource,
    pub performance: PerformanceSource,
    pub units_produced: String,
    pub good: GoodSource,
}

impl ColumnLayout {
    /// 根据表头解析列布局
    pub fn resolve(headers: &[String]) -> ImportResult<Self> {
        // 规范化列名 → 源列名（同名时保留第一个）
        let mut found: HashMap<Column, String> = HashMap::new();
        for header in headers {
            let normalized = normalize_header(header);
            if normalized.is_empty() {
                continue;
            }
            for column in Column::ALL {
                if column.aliases().contains(&normalized.as_str()) {
                    found.entry(column).or_insert_with(|| header.clone());
                }
            }
        }

        let take = |column: Column| -> ImportResult<String> {
            found
                .get(&column)
                .cloned()
                .ok_or_else(|| ImportError::MissingColumn {
                    column: column.canonical_name().to_string(),
                })
        };
        let either = |primary: Column, fallback: Column| -> ImportResult<(bool, String)> {
            if let Some(h) = found.get(&primary) {
                return Ok((true, h.clone()));
            }
            if let Some(h) = found.get(&fallback) {
                return Ok((false, h.clone()));
            }
            Err(ImportError::MissingColumn {
                column: format!(
                    "{}（或 {}）",
                    primary.canonical_name(),
                    fallback.canonical_name()
                ),
            })
        };

        let date = take(Column::Date)?;
        let machine = take(Column::Machine)?;
        let product = take(Column::Product)?;

        let planned = match either(Column::PlannedMinutes, Column::WorkingDays)? {
            (true, h) => PlannedSource::Minutes(h),
            (false, h) => PlannedSource::WorkingDays(h),
        };
        let downtime = match either(Column::DowntimeMinutes, Column::DowntimeHours)? {
            (true, h) => DowntimeSource::Minutes(h),
            (false, h) => DowntimeSource::Hours(h),
        };

        // 节拍列齐全时优先；否则退回性能率列
        let performance = match (
            found.get(&Column::CycleTimeActual),
            found.get(&Column::CycleTimeIdeal),
            found.get(&Column::PerformanceRatio),
        ) {
            (Some(actual), Some(ideal), _) => PerformanceSource::CycleTimes {
                actual: actual.clone(),
                ideal: ideal.clone(),
            },
            (_, _, Some(ratio)) => PerformanceSource::Ratio(ratio.clone()),
            (actual, _, None) => {
                let missing = if actual.is_none() {
                    Column::CycleTimeActual
                } else {
                    Column::CycleTimeIdeal
                };
                return Err(ImportError::MissingColumn {
                    column: format!(
                        "{}（或 {}）",
                        missing.canonical_name(),
                        Column::PerformanceRatio.canonical_name()
                    ),
                });
            }
        };
        let units_produced = take(Column::UnitsProduced)?;

        let good = match either(Column::UnitsGood, Column::UnitsRejected)? {
            (true, h) => GoodSource::Good(h),
            (false, h) => GoodSource::Rejected(h),
        };

        Ok(Self {
            date,
            machine,
            product,
            planned,
            downtime,
            performance,
            units_produced,
            good,
        })
    }
}

// ==========================================
// FieldMapper - 行映射
// ==========================================
pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn resolve_layout(&self, headers: &[String]) -> ImportResult<ColumnLayout> {
        ColumnLayout::resolve(headers)
    }

    fn map_to_record(&self, layout: &ColumnLayout, row: &RawRow) -> ImportResult<ProductionRecord> {
        let row_number = row.row_number;

        let date = self.parse_date(row, &layout.date)?;
        let machine_id = self.get_text(row, &layout.machine)?;
        let product_id = self.get_text(row, &layout.product)?;

        let (planned_minutes, working_days) = match &layout.planned {
            PlannedSource::Minutes(h) => (self.parse_f64(row, h)?, None),
            // 计划分钟数由筛选层按 hours_per_day 换算
            PlannedSource::WorkingDays(h) => (0.0, Some(self.parse_f64(row, h)?)),
        };

        let downtime_minutes = match &layout.downtime {
            DowntimeSource::Minutes(h) => self.parse_f64(row, h)?,
            DowntimeSource::Hours(h) => self.parse_f64(row, h)? * 60.0,
        };

        let (cycle_time_actual, cycle_time_ideal, performance_ratio) = match &layout.performance {
            PerformanceSource::CycleTimes { actual, ideal } => {
                (self.parse_f64(row, actual)?, self.parse_f64(row, ideal)?, None)
            }
            PerformanceSource::Ratio(h) => (0.0, 0.0, Some(self.parse_ratio(row, h)?)),
        };
        let units_produced = self.parse_f64(row, &layout.units_produced)?;

        let units_good = match &layout.good {
            GoodSource::Good(h) => self.parse_f64(row, h)?,
            GoodSource::Rejected(h) => units_produced - self.parse_f64(row, h)?,
        };

        Ok(ProductionRecord {
            date,
            machine_id,
            product_id,
            planned_minutes,
            downtime_minutes,
            cycle_time_actual,
            cycle_time_ideal,
            units_produced,
            units_good,
            working_days,
            performance_ratio,
            row_number,
        })
    }
}

impl FieldMapper {
    fn malformed(row: &RawRow, column: &str, value: &str, message: &str) -> ImportError {
        ImportError::MalformedValue {
            row: row.row_number,
            column: column.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }

    /// 提取非空文本
    fn get_text(&self, row: &RawRow, column: &str) -> ImportResult<String> {
        let value = row.get(column).unwrap_or("").trim();
        if value.is_empty() {
            return Err(Self::malformed(row, column, value, "值为空"));
        }
        Ok(value.to_string())
    }

    /// 解析浮点数（允许千分位逗号）
    fn parse_f64(&self, row: &RawRow, column: &str) -> ImportResult<f64> {
        let raw = row.get(column).unwrap_or("").trim();
        if raw.is_empty() {
            return Err(Self::malformed(row, column, raw, "值为空"));
        }

        let cleaned = raw.replace(',', "");
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Self::malformed(row, column, raw, "无法解析为数值")),
        }
    }

    /// 解析比率: "89%" → 0.89，"0.89" 原样
    fn parse_ratio(&self, row: &RawRow, column: &str) -> ImportResult<f64> {
        let raw = row.get(column).unwrap_or("").trim();
        match raw.strip_suffix('%') {
            Some(pct) => pct
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v / 100.0)
                .ok_or_else(|| Self::malformed(row, column, raw, "无法解析为百分比")),
            None => self.parse_f64(row, column),
        }
    }

    /// 解析日期（YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD / 带时间部分）
    fn parse_date(&self, row: &RawRow, column: &str) -> ImportResult<NaiveDate> {
        let raw = row.get(column).unwrap_or("").trim();
        if raw.is_empty() {
            return Err(Self::malformed(row, column, raw, "值为空"));
        }

        const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d.%m.%Y"];
        const DATETIME_FORMATS: [&str; 3] =
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
            .ok_or_else(|| Self::malformed(row, column, raw, "日期格式错误，期望 YYYY-MM-DD"))
    }
}
