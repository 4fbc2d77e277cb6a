// ==========================================
// 生产 OEE 驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + serde
// 系统定位: 由生产记录表计算可用率/性能率/质量率/OEE
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 筛选与指标计算
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 驾驶舱配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 驾驶舱接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Granularity, GroupBy, GroupKey, PartitionOrder, YearMonth};

// 领域实体
pub use domain::{
    AggregateRow, AggregateView, FilterCriteria, FilterOptions, KpiEvaluation, KpiResult,
    KpiTotals, LoadedDataset, MetricWarning, ProductionRecord, TrendPoint,
};

// 引擎
pub use engine::{FilterEngine, MetricEngine};

// 导入
pub use importer::{ImportError, RecordLoader};

// API
pub use api::{DashboardApi, DashboardSnapshot, DrilldownView};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产 OEE 驾驶舱";
