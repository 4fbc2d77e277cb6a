// ==========================================
// 生产 OEE 驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 存储: JSON 文件（缺省时使用内置默认值）
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::domain::filter::{DEFAULT_HOURS_PER_DAY, MAX_HOURS_PER_DAY, MIN_HOURS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const HOURS_PER_DAY: &str = "hours_per_day";
    pub const DEFAULT_FILE: &str = "default_file";
    pub const RANKING_LIMIT: &str = "ranking_limit";

    /// 环境变量覆写
    pub const ENV_HOURS_PER_DAY: &str = "OEE_DASHBOARD_HOURS_PER_DAY";
    pub const ENV_DEFAULT_FILE: &str = "OEE_DASHBOARD_DEFAULT_FILE";
    pub const ENV_RANKING_LIMIT: &str = "OEE_DASHBOARD_RANKING_LIMIT";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// DashboardConfig - 驾驶舱配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// 每个工作日的计划工时（默认 24）
    pub hours_per_day: f64,
    /// 未指定文件时尝试加载的默认文件
    pub default_file: String,
    /// 排名表最多显示的行数（None = 不限）
    pub ranking_limit: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            default_file: "Production data.xlsx".to_string(),
            ranking_limit: None,
        }
    }
}

impl DashboardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(&self.hours_per_day) {
            return Err(ConfigError::ValueError {
                key: config_keys::HOURS_PER_DAY.to_string(),
                value: self.hours_per_day.to_string(),
                message: format!("应在 [{}, {}] 内", MIN_HOURS_PER_DAY, MAX_HOURS_PER_DAY),
            });
        }
        if self.default_file.trim().is_empty() {
            return Err(ConfigError::ValueError {
                key: config_keys::DEFAULT_FILE.to_string(),
                value: self.default_file.clone(),
                message: "不能为空".to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: DashboardConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 默认配置文件路径: <config_dir>/oee-dashboard/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("oee-dashboard").join("config.json"))
    }

    /// 仅使用默认值
    pub fn with_defaults() -> Self {
        Self {
            config: DashboardConfig::default(),
            source: None,
        }
    }

    /// 从指定 JSON 文件加载（文件必须存在）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&raw, path)?;
        info!(path = %path.display(), "已加载配置文件");

        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 加载配置并应用环境变量覆写
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件；为 None 时尝试默认路径，不存在则用默认值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("未找到配置文件，使用默认配置");
                    Self::with_defaults()
                }
            },
        };

        manager.apply_env_overrides(|key| std::env::var(key).ok())?;
        manager.config.validate()?;
        Ok(manager)
    }

    /// 解析 JSON 配置
    pub fn parse(raw: &str, path: &Path) -> Result<DashboardConfig, ConfigError> {
        let config: DashboardConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 应用环境变量覆写（lookup 便于测试注入）
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(config_keys::ENV_HOURS_PER_DAY) {
            self.config.hours_per_day =
                value.trim().parse::<f64>().map_err(|e| ConfigError::ValueError {
                    key: config_keys::HOURS_PER_DAY.to_string(),
                    value: value.clone(),
                    message: e.to_string(),
                })?;
        }

        if let Some(value) = lookup(config_keys::ENV_DEFAULT_FILE) {
            self.config.default_file = value.trim().to_string();
        }

        if let Some(value) = lookup(config_keys::ENV_RANKING_LIMIT) {
            let limit = value.trim().parse::<usize>().map_err(|e| ConfigError::ValueError {
                key: config_keys::RANKING_LIMIT.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })?;
            self.config.ranking_limit = Some(limit);
        }

        self.config.validate()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// 配置来源文件（默认值时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn hours_per_day(&self) -> f64 {
        self.config.hours_per_day
    }

    pub fn default_file(&self) -> &str {
        &self.config.default_file
    }

    pub fn ranking_limit(&self) -> Option<usize> {
        self.config.ranking_limit
    }
}
