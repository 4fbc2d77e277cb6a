use std::time::Instant;

/// 性能统计 Guard：记录一次重算的 elapsed_ms + 输入/输出记录数
///
/// 使用方式：
/// ```ignore
/// let mut perf = oee_dashboard::perf::PerfGuard::new("dashboard_snapshot", records.len());
/// // do work...
/// perf.set_output(filtered.len());
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    input_records: usize,
    output_records: Option<usize>,
}

impl PerfGuard {
    pub fn new(op: &'static str, input_records: usize) -> Self {
        Self {
            op,
            start: Instant::now(),
            input_records,
            output_records: None,
        }
    }

    /// 记录本次计算实际参与的记录数（筛选后）
    pub fn set_output(&mut self, output_records: usize) {
        self.output_records = Some(output_records);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.elapsed_ms(),
            input_records = self.input_records,
            output_records = self.output_records.unwrap_or(self.input_records),
            "done"
        );
    }
}
