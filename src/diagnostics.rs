//! 定义 SeverityRouter 的内部诊断与指标。
//!
//! 日志调用的失败会返回给调用方，但忽略返回值的调用方仍可通过这些计数器观察到日志降级。

use std::sync::atomic::{AtomicU64, Ordering};

/// 内部诊断与指标数据结构。
///
/// 使用原子操作确保线程安全，每个路由器实例拥有自己的一份。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 已输出的记录数
    records_emitted: AtomicU64,

    /// 因低于最低级别而丢弃的记录数
    records_filtered: AtomicU64,

    /// 控制台写入次数
    console_writes: AtomicU64,

    /// 文件写入次数
    file_writes: AtomicU64,

    /// 写入失败次数
    write_errors: AtomicU64,

    /// 日志目录不可用导致的失败次数
    configuration_errors: AtomicU64,

    /// 已挂载的 sink 数
    sinks_attached: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosticsSnapshot {
    pub records_emitted: u64,
    pub records_filtered: u64,
    pub console_writes: u64,
    pub file_writes: u64,
    pub write_errors: u64,
    pub configuration_errors: u64,
    pub sinks_attached: u64,
}

impl DiagnosticsSnapshot {
    /// 失败总数（写入 + 配置）
    pub fn total_errors(&self) -> u64 {
        self.write_errors + self.configuration_errors
    }
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_records_emitted(&self) {
        self.records_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_filtered(&self) {
        self.records_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_console_writes(&self) {
        self.console_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_file_writes(&self) {
        self.file_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_write_errors(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_configuration_errors(&self) {
        self.configuration_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sinks_attached(&self) {
        self.sinks_attached.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取当前诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            records_filtered: self.records_filtered.load(Ordering::Relaxed),
            console_writes: self.console_writes.load(Ordering::Relaxed),
            file_writes: self.file_writes.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            configuration_errors: self.configuration_errors.load(Ordering::Relaxed),
            sinks_attached: self.sinks_attached.load(Ordering::Relaxed),
        }
    }
}
