// ==========================================
// 生产 OEE 驾驶舱 - 生产记录实体
// ==========================================
// 职责: 导入后的强类型生产记录（一行 = 一次生产事件）
// 红线: 导入后不可变；计划时间的解析只在筛选层产生新副本
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 生产日期
    pub date: NaiveDate,
    /// 机台编号
    pub machine_id: String,
    /// 产品/模具编号
    pub product_id: String,

    /// 计划生产时间（分钟）
    pub planned_minutes: f64,
    /// 停机时间（分钟）
    pub downtime_minutes: f64,

    /// 实际节拍（秒/件）
    pub cycle_time_actual: f64,
    /// 理想节拍（秒/件）
    pub cycle_time_ideal: f64,

    /// 产出数量
    pub units_produced: f64,
    /// 良品数量
    pub units_good: f64,

    /// 源数据以"工作天数"给出计划时间时保留原值，
    /// 由筛选层按 hours_per_day 换算为 planned_minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_days: Option<f64>,

    /// 源数据直接给出性能率（0.89 = 89%）时保留原值，
    /// 此时不使用节拍字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_ratio: Option<f64>,

    /// 源文件行号（含表头，从 1 开始）
    #[serde(default)]
    pub row_number: usize,
}

impl ProductionRecord {
    /// 不良品数量
    pub fn units_rejected(&self) -> f64 {
        (self.units_produced - self.units_good).max(0.0)
    }

    /// 单条记录的性能率样本，钳位到 [0, 1]
    ///
    /// 优先使用源数据给出的性能率；否则为 理想节拍 / 实际节拍，
    /// 实际节拍 <= 0 时无样本
    pub fn performance_sample(&self) -> Option<f64> {
        match self.performance_ratio {
            Some(ratio) => Some(ratio.clamp(0.0, 1.0)),
            None if self.cycle_time_actual > 0.0 => {
                Some((self.cycle_time_ideal / self.cycle_time_actual).clamp(0.0, 1.0))
            }
            None => None,
        }
    }

    /// 按班制时长解析计划时间
    ///
    /// 仅对以工作天数给出计划时间的记录生效，其余记录原样返回
    pub fn with_planned_hours_per_day(&self, hours_per_day: f64) -> Self {
        match self.working_days {
            Some(days) => Self {
                planned_minutes: days * hours_per_day * 60.0,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}
