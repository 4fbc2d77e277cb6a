// ==========================================
// 生产 OEE 驾驶舱 - 引擎层
// ==========================================
// 职责: 筛选层 + 指标引擎（比率、分组、排名、趋势）
// 红线: 纯函数，不读文件，不持有可变状态
// ==========================================

pub mod aggregation;
pub mod filter;
pub mod metrics;
pub mod trend;

// 重导出核心引擎
pub use aggregation::{group_key, partition};
pub use filter::FilterEngine;
pub use metrics::MetricEngine;
pub use trend::periods;
