// ==========================================
// 生产 OEE 驾驶舱 - 领域类型定义
// ==========================================
// 职责: 分组维度、趋势粒度、分组键、排序方式
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// 分组维度 (Group By)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupBy {
    Machine, // 机台
    Product, // 产品/模具
    Day,     // 自然日
    Month,   // 自然月
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::Machine => write!(f, "MACHINE"),
            GroupBy::Product => write!(f, "PRODUCT"),
            GroupBy::Day => write!(f, "DAY"),
            GroupBy::Month => write!(f, "MONTH"),
        }
    }
}

// ==========================================
// 趋势粒度 (Trend Granularity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Day,
    Month,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "DAY"),
            Granularity::Month => write!(f, "MONTH"),
        }
    }
}

// ==========================================
// 分区排序方式 (Partition Order)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartitionOrder {
    /// 按键首次出现的顺序
    #[default]
    FirstSeen,
    /// OEE 降序，同值按键升序
    RankedByOee,
}

// ==========================================
// 年月 (Year-Month)
// ==========================================
// 字段顺序即比较顺序: 先年后月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 当月第一天
    pub fn first_day(&self) -> NaiveDate {
        // month 始终来自合法日期，1..=12
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 下一个月
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// 分组键 (Group Key)
// ==========================================
// 同一 AggregateView 内只会出现同一种变体；
// 排序: 字符串按字典序，日期/年月按时间先后
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKey {
    Machine(String),
    Product(String),
    Day(NaiveDate),
    Month(YearMonth),
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            GroupKey::Machine(_) => 0,
            GroupKey::Product(_) => 1,
            GroupKey::Day(_) => 2,
            GroupKey::Month(_) => 3,
        }
    }

    /// 分组键的展示文本
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Machine(a), GroupKey::Machine(b)) => a.cmp(b),
            (GroupKey::Product(a), GroupKey::Product(b)) => a.cmp(b),
            (GroupKey::Day(a), GroupKey::Day(b)) => a.cmp(b),
            (GroupKey::Month(a), GroupKey::Month(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Machine(m) => write!(f, "{}", m),
            GroupKey::Product(p) => write!(f, "{}", p),
            GroupKey::Day(d) => write!(f, "{}", d),
            GroupKey::Month(ym) => write!(f, "{}", ym),
        }
    }
}
