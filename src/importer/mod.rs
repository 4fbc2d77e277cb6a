// ==========================================
// 生产 OEE 驾驶舱 - 导入层
// ==========================================
// 职责: 外部表格文件 → 强类型生产记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod record_loader;
pub mod record_loader_trait;

// 重导出核心类型
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{
    ColumnLayout, DowntimeSource, FieldMapper as FieldMapperImpl, GoodSource, PerformanceSource,
};
pub use file_parser::{CsvParser, ExcelParser, RawRow, RawSheet, UniversalFileParser};
pub use record_loader::RecordLoader;

// 重导出 Trait 接口
pub use record_loader_trait::{DqValidator, FieldMapper, FileParser};
