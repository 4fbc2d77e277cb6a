// ==========================================
// 生产 OEE 驾驶舱 - 筛选条件
// ==========================================
// 职责: 每次交互重建的不可变筛选条件
// 红线: 不存在进程级的"当前筛选"状态，调用方显式传入
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// 班制时长下限（小时）
pub const MIN_HOURS_PER_DAY: f64 = 1.0;
/// 班制时长上限（小时）
pub const MAX_HOURS_PER_DAY: f64 = 24.0;
/// 默认班制时长（小时）
pub const DEFAULT_HOURS_PER_DAY: f64 = 24.0;

/// 筛选条件校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("日期范围无效: 起始 {from} 晚于结束 {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("每日计划工时超出范围 [{min}, {max}]: {value}")]
    HoursPerDayOutOfRange { value: f64, min: f64, max: f64 },
}

// ==========================================
// FilterCriteria - 筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// 起始日期（含），None 表示不限
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// 结束日期（含），None 表示不限
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// 机台集合，空集表示全部
    #[serde(default)]
    pub machine_set: BTreeSet<String>,
    /// 产品/模具集合，空集表示全部
    #[serde(default)]
    pub product_set: BTreeSet<String>,
    /// 每个工作日的计划工时
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
}

fn default_hours_per_day() -> f64 {
    DEFAULT_HOURS_PER_DAY
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            machine_set: BTreeSet::new(),
            product_set: BTreeSet::new(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn machines<I, S>(mut self, machines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.machine_set = machines.into_iter().map(Into::into).collect();
        self
    }

    pub fn products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_set = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// 校验筛选条件
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CriteriaError::InvertedDateRange { from, to });
            }
        }

        if !(MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(&self.hours_per_day) {
            return Err(CriteriaError::HoursPerDayOutOfRange {
                value: self.hours_per_day,
                min: MIN_HOURS_PER_DAY,
                max: MAX_HOURS_PER_DAY,
            });
        }

        Ok(())
    }

    /// 日期是否落在 [date_from, date_to] 内
    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from)
            && self.date_to.map_or(true, |to| date <= to)
    }

    pub fn accepts_machine(&self, machine_id: &str) -> bool {
        self.machine_set.is_empty() || self.machine_set.contains(machine_id)
    }

    pub fn accepts_product(&self, product_id: &str) -> bool {
        self.product_set.is_empty() || self.product_set.contains(product_id)
    }
}

// ==========================================
// FilterOptions - 筛选控件可选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// 日期范围内的全部机台（排序）
    pub machines: Vec<String>,
    /// 所选机台下的全部产品/模具（排序）
    pub products: Vec<String>,
    /// 数据集最早日期
    pub date_min: Option<NaiveDate>,
    /// 数据集最晚日期
    pub date_max: Option<NaiveDate>,
}
