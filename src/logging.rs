// ==========================================
// 日志系统初始化
// ==========================================
// 输出: stderr（stdout 留给驾驶舱 JSON/文本输出）
// 级别: RUST_LOG，缺省 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读（终端）
    #[default]
    Pretty,
    /// JSON 行（日志采集）
    Json,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 按指定格式初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 例如 RUST_LOG=debug 或 RUST_LOG=oee_dashboard::engine=trace,perf=info
///
/// # 示例
/// ```no_run
/// use oee_dashboard::logging::{self, LogFormat};
/// logging::init_with(LogFormat::Json);
/// ```
pub fn init_with(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.with_target(true).with_line_number(true).init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// 终端格式初始化
pub fn init() {
    init_with(LogFormat::Pretty);
}

/// 测试环境：debug 级别，输出交给测试框架捕获，可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}
