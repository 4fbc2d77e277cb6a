// ==========================================
// 生产 OEE 驾驶舱 - 生产记录导入器
// ==========================================
// 职责: 整合导入流程，从文件到内存数据集
// 流程: 解析 → 列布局 → 行映射 → DQ 校验 → 数据集
// 红线: 缺列 / 格式错误立即中止，不静默跳过
// ==========================================

use crate::domain::dataset::{DqLevel, LoadedDataset};
use crate::importer::dq_validator::DqValidator as DqValidatorImpl;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{CsvParser, RawSheet, UniversalFileParser};
use crate::importer::record_loader_trait::{DqValidator, FieldMapper, FileParser};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RecordLoader - 生产记录导入器
// ==========================================
pub struct RecordLoader {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    dq_validator: Box<dyn DqValidator>,
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new(
            Box::new(UniversalFileParser),
            Box::new(FieldMapperImpl),
            Box::new(DqValidatorImpl::new()),
        )
    }
}

impl RecordLoader {
    /// 创建导入器
    ///
    /// # 参数
    /// - file_parser: 文件解析器
    /// - field_mapper: 列映射器
    /// - dq_validator: DQ 校验器
    pub fn new(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        dq_validator: Box<dyn DqValidator>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            dq_validator,
        }
    }

    /// 从文件导入（按扩展名选择 CSV / Excel）
    ///
    /// # 返回
    /// - Ok(LoadedDataset): 通过校验的记录 + DQ 报告
    /// - Err(MissingColumn / MalformedValue / ...): 导入中止
    #[instrument(skip(self, file_path))]
    pub fn load<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<LoadedDataset> {
        let path = file_path.as_ref();
        let source = path.display().to_string();
        info!(file_path = %source, "开始导入生产记录");

        debug!("步骤 1: 解析文件");
        let sheet = self.file_parser.parse_to_raw_sheet(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        self.build_dataset(source, sheet)
    }

    /// 从内存中的 CSV 导入（上传控件、测试）
    pub fn load_csv_reader<R: Read>(
        &self,
        source: impl Into<String>,
        reader: R,
    ) -> ImportResult<LoadedDataset> {
        let sheet = CsvParser.parse_reader(reader)?;
        self.build_dataset(source.into(), sheet)
    }

    fn build_dataset(&self, source: String, sheet: RawSheet) -> ImportResult<LoadedDataset> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let total_rows = sheet.rows.len();
        info!(batch_id = %batch_id, total_rows, "文件解析完成");

        // === 步骤 2: 列布局 ===
        debug!("步骤 2: 解析列布局");
        let layout = self.field_mapper.resolve_layout(&sheet.headers).map_err(|e| {
            error!(error = %e, headers = ?sheet.headers, "表结构不匹配");
            e
        })?;

        // === 步骤 3: 行映射 ===
        debug!("步骤 3: 行映射");
        let mut records = Vec::with_capacity(total_rows);
        for row in &sheet.rows {
            let record = self.field_mapper.map_to_record(&layout, row).map_err(|e| {
                error!(error = %e, row = row.row_number, "行解析失败");
                e
            })?;
            records.push(record);
        }

        // === 步骤 4: DQ 校验 ===
        debug!("步骤 4: 数据质量校验");
        let mut violations = Vec::new();
        for record in &records {
            violations.extend(self.dq_validator.validate_record(record));
        }

        let blocked: HashSet<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .map(|v| v.row_number)
            .collect();
        if !blocked.is_empty() {
            warn!(blocked = blocked.len(), "存在违反数据不变量的行，已排除");
        }
        records.retain(|r| !blocked.contains(&r.row_number));

        let dq_report = self
            .dq_validator
            .generate_dq_report(batch_id.clone(), total_rows, violations);

        info!(
            batch_id = %batch_id,
            accepted = dq_report.summary.accepted,
            blocked = dq_report.summary.blocked,
            warning = dq_report.summary.warning,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "生产记录导入完成"
        );

        Ok(LoadedDataset {
            batch_id,
            source,
            records,
            dq_report,
        })
    }
}
