// ==========================================
// 生产 OEE 驾驶舱 - API层错误类型
// ==========================================
// 职责: 统一 API 层错误，转换导入/筛选错误为用户可读的消息
// 约定: 除零与空筛选结果不是错误，不在此定义
// ==========================================

use crate::config::ConfigError;
use crate::domain::filter::CriteriaError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("筛选条件无效: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    // ==========================================
    // 导入错误（缺列时驾驶舱停止渲染）
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为需修正源文件的表结构错误
    pub fn is_missing_column(&self) -> bool {
        matches!(self, ApiError::Import(e) if e.is_missing_column())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
