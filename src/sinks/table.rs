//! 已挂载 sink 表
//!
//! 路由器持有的显式 sink 集合：一个控制台槽位和若干文件槽位。
//! 去重规则由 `AttachPolicy` 决定：
//!
//! - `ByKind`：文件槽位最多一个，第一个挂载的文件 sink 一直生效，
//!   之后请求其他类别的调用也复用它
//! - `ByCategory`：每个类别各占一个文件槽位

use crate::config::AttachPolicy;
use crate::core::record::LogRecord;
use crate::sinks::console::ConsoleSink;
use crate::sinks::file::{FileCategory, FileSink};
use crate::sinks::traits::{LogSink, SinkKind, SinkMetadata};

/// 一次日志调用想要使用的 sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkRequest {
    Console,
    File(FileCategory),
}

/// 已挂载 sink 表
#[derive(Debug)]
pub struct SinkTable {
    policy: AttachPolicy,
    console: Option<ConsoleSink>,
    files: Vec<FileSink>,
}

impl SinkTable {
    pub fn new(policy: AttachPolicy) -> Self {
        Self {
            policy,
            console: None,
            files: Vec::new(),
        }
    }

    /// 请求是否已被某个已挂载的 sink 满足
    pub fn satisfies(&self, request: SinkRequest) -> bool {
        match request {
            SinkRequest::Console => self.console.is_some(),
            SinkRequest::File(category) => match self.policy {
                AttachPolicy::ByKind => !self.files.is_empty(),
                AttachPolicy::ByCategory => self.files.iter().any(|f| f.category() == category),
            },
        }
    }

    /// 挂载控制台 sink，已有时返回 false 并丢弃新 sink
    pub fn attach_console(&mut self, sink: ConsoleSink) -> bool {
        if self.console.is_some() {
            return false;
        }
        self.console = Some(sink);
        true
    }

    /// 挂载文件 sink，已被满足时返回 false 并丢弃新 sink
    pub fn attach_file(&mut self, sink: FileSink) -> bool {
        if self.satisfies(SinkRequest::File(sink.category())) {
            return false;
        }
        self.files.push(sink);
        true
    }

    /// 指定大类已挂载的 sink 数
    pub fn count(&self, kind: SinkKind) -> usize {
        match kind {
            SinkKind::Stream => usize::from(self.console.is_some()),
            SinkKind::File => self.files.len(),
        }
    }

    /// 已挂载的 sink 总数
    pub fn len(&self) -> usize {
        self.count(SinkKind::Stream) + self.count(SinkKind::File)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 已挂载的文件类别，按挂载顺序
    pub fn file_categories(&self) -> Vec<FileCategory> {
        self.files.iter().map(|f| f.category()).collect()
    }

    /// 所有已挂载 sink 的元数据，控制台在前
    pub fn metadata(&self) -> Vec<SinkMetadata> {
        self.console
            .iter()
            .map(|c| c.metadata())
            .chain(self.files.iter().map(|f| f.metadata()))
            .collect()
    }

    /// 记录应当经过的 sink
    ///
    /// `ByKind` 下记录经过所有已挂载的 sink；`ByCategory` 下经过控制台
    /// 以及与记录级别同类别的文件 sink。
    pub fn targets_for(&mut self, record: &LogRecord) -> Vec<&mut dyn LogSink> {
        let policy = self.policy;
        let category = FileCategory::for_severity(record.severity);

        let mut targets: Vec<&mut dyn LogSink> = Vec::with_capacity(self.len());
        if let Some(console) = self.console.as_mut() {
            targets.push(console);
        }
        for file in self.files.iter_mut() {
            let selected = match policy {
                AttachPolicy::ByKind => true,
                AttachPolicy::ByCategory => Some(file.category()) == category,
            };
            if selected {
                targets.push(file);
            }
        }
        targets
    }

    /// 所有已挂载的 sink
    pub fn all_mut(&mut self) -> Vec<&mut dyn LogSink> {
        let mut sinks: Vec<&mut dyn LogSink> = Vec::with_capacity(self.len());
        if let Some(console) = self.console.as_mut() {
            sinks.push(console);
        }
        for file in self.files.iter_mut() {
            sinks.push(file);
        }
        sinks
    }
}
