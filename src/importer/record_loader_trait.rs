// ==========================================
// 生产 OEE 驾驶舱 - 记录导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 列映射与类型转换 → 数据质量校验
// ==========================================

use crate::domain::dataset::{DqReport, DqViolation};
use crate::domain::record::ProductionRecord;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ColumnLayout;
use crate::importer::file_parser::{RawRow, RawSheet};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录
    ///
    /// # 返回
    /// - Ok(RawSheet): 表头（已 TRIM）与非空行
    /// - Err: 文件不存在、扩展名不支持、格式错误
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列映射接口（阶段 1）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 根据表头解析列布局
    ///
    /// # 返回
    /// - Err(MissingColumn): 必需列缺失，导入中止
    fn resolve_layout(&self, headers: &[String]) -> ImportResult<ColumnLayout>;

    /// 将原始行映射为 ProductionRecord
    ///
    /// # 返回
    /// - Err(MalformedValue): 单元格无法解析，错误中包含行号和列名
    fn map_to_record(&self, layout: &ColumnLayout, row: &RawRow) -> ImportResult<ProductionRecord>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验接口（阶段 2）
// 实现者: DqValidatorImpl
pub trait DqValidator: Send + Sync {
    /// 校验单条记录的不变量
    ///
    /// # 规则
    /// - 负数、良品 > 产出 → Error（记录不进入数据集）
    /// - 停机 > 计划时间 → Warning（保留，可用率钳位）
    /// - 实际节拍 <= 0 → Info（保留，性能率跳过）
    fn validate_record(&self, record: &ProductionRecord) -> Vec<DqViolation>;

    /// 生成 DQ 报告
    fn generate_dq_report(
        &self,
        batch_id: String,
        total_rows: usize,
        violations: Vec<DqViolation>,
    ) -> DqReport;
}
