// ==========================================
// 生产 OEE 驾驶舱 - 配置层
// ==========================================
// 职责: 驾驶舱配置管理，支持文件 + 环境变量覆写
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, DashboardConfig};
