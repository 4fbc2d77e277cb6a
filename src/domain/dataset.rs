// ==========================================
// 生产 OEE 驾驶舱 - 数据集与数据质量报告
// ==========================================
// 职责: 导入批次、DQ 违规明细、DQ 汇总
// ==========================================

use crate::domain::record::ProductionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误（该行不参与计算）
    Warning, // 警告（保留，计算时钳位）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,          // 原始文件行号
    pub machine_id: Option<String>, // 机台（如果可解析）
    pub level: DqLevel,             // 违规级别
    pub field: String,              // 违规字段
    pub message: String,            // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数（不含空行）
    pub accepted: usize,   // 进入数据集
    pub blocked: usize,    // 阻断（ERROR）
    pub warning: usize,    // 警告条数
    pub info: usize,       // 提示条数
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub batch_id: String,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

// ==========================================
// LoadedDataset - 一次导入得到的不可变数据集
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedDataset {
    /// 导入批次 ID
    pub batch_id: String,
    /// 源文件路径
    pub source: String,
    /// 通过校验的生产记录（保持文件顺序）
    pub records: Vec<ProductionRecord>,
    /// 数据质量报告
    pub dq_report: DqReport,
}

impl LoadedDataset {
    /// 直接由内存记录构造（测试及嵌入场景）
    pub fn from_records(source: impl Into<String>, records: Vec<ProductionRecord>) -> Self {
        let batch_id = uuid::Uuid::new_v4().to_string();
        let total = records.len();
        Self {
            batch_id: batch_id.clone(),
            source: source.into(),
            records,
            dq_report: DqReport {
                batch_id,
                summary: DqSummary {
                    total_rows: total,
                    accepted: total,
                    ..DqSummary::default()
                },
                violations: Vec::new(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 数据集覆盖的日期范围
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// 全部机台（去重、排序）
    pub fn machines(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.machine_id.clone()).collect()
    }

    /// 全部产品/模具（去重、排序）
    pub fn products(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.product_id.clone()).collect()
    }
}
