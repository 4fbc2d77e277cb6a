// ==========================================
// 生产 OEE 驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义生产记录、筛选条件、KPI 结果等领域类型
// 红线: 不含文件读取逻辑，不含指标计算逻辑
// ==========================================

pub mod dataset;
pub mod filter;
pub mod kpi;
pub mod record;
pub mod types;

// 重导出核心类型
pub use dataset::{DqLevel, DqReport, DqSummary, DqViolation, LoadedDataset};
pub use filter::{CriteriaError, FilterCriteria, FilterOptions};
pub use kpi::{
    AggregateRow, AggregateView, KpiEvaluation, KpiResult, KpiTotals, MetricWarning,
    RatioOutcome, TrendPoint,
};
pub use record::ProductionRecord;
pub use types::{Granularity, GroupBy, GroupKey, PartitionOrder, YearMonth};
