// ==========================================
// 生产 OEE 驾驶舱 - API 层
// ==========================================
// 职责: 提供驾驶舱接口，供 CLI（及后续前端）调用
// ==========================================

pub mod dashboard_api;
pub mod dto;
pub mod error;
pub mod report;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use dto::{DashboardSnapshot, DrilldownView, KpiCard, RecordKpiPoint, EMPTY_STATE_MESSAGE};
pub use error::{ApiError, ApiResult};
pub use report::{format_pct, render_drilldown, render_records, render_snapshot};
