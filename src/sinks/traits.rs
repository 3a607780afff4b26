//! SeverityRouter Sink Traits
//!
//! 定义了统一的 Sink trait 接口。
//!
//! # 架构设计
//!
//! - `LogSink`: 所有 sink 的核心接口，同步写入，每条记录写完即刷新
//! - `SinkKind`: 去重使用的大类，流型（控制台）或文件型
//!
//! 路由器在自己的锁内调用 sink，因此 sink 方法接收 `&mut self`，
//! 实现者不需要自己做同步。

use crate::core::formatter::RecordFormatter;
use crate::core::record::LogRecord;
use crate::error::Result;
use std::fmt::Debug;

/// Sink 大类
///
/// 去重按大类进行，比五个级别和两个文件类别都粗。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// 流型 sink（控制台）
    Stream,
    /// 文件型 sink
    File,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Stream => "stream",
            SinkKind::File => "file",
        }
    }
}

/// Sink 元数据
///
/// 包含 sink 的基本信息和类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkMetadata {
    /// Sink 名称
    pub name: String,
    /// Sink 大类
    pub kind: SinkKind,
    /// 描述信息（文件路径或输出流）
    pub description: Option<String>,
}

/// 基础 Sink trait
///
/// 定义了所有日志输出目标必须实现的核心接口。
pub trait LogSink: Send + Debug {
    /// 用绑定的格式化器渲染记录并写出
    ///
    /// # 返回值
    ///
    /// 写入失败时返回 `RouterError::Write`
    fn emit(&mut self, record: &LogRecord) -> Result<()>;

    /// 刷新缓冲区
    fn flush(&mut self) -> Result<()>;

    /// Sink 大类
    fn kind(&self) -> SinkKind;

    /// 获取 sink 的名称
    fn name(&self) -> &'static str;

    /// 绑定的格式化器
    fn formatter(&self) -> &RecordFormatter;

    /// 获取 sink 的元数据
    fn metadata(&self) -> SinkMetadata;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Severity;

    #[derive(Debug)]
    struct CountingSink {
        formatter: RecordFormatter,
        lines: Vec<String>,
    }

    impl LogSink for CountingSink {
        fn emit(&mut self, record: &LogRecord) -> Result<()> {
            self.lines.push(self.formatter.format(record));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn kind(&self) -> SinkKind {
            SinkKind::Stream
        }

        fn name(&self) -> &'static str {
            "counting"
        }

        fn formatter(&self) -> &RecordFormatter {
            &self.formatter
        }

        fn metadata(&self) -> SinkMetadata {
            SinkMetadata {
                name: self.name().to_string(),
                kind: self.kind(),
                description: None,
            }
        }
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut sink = CountingSink {
            formatter: RecordFormatter::console(false),
            lines: Vec::new(),
        };

        {
            let dynamic: &mut dyn LogSink = &mut sink;
            dynamic
                .emit(&LogRecord::new(Severity::Info, "hello"))
                .unwrap();
            assert_eq!(dynamic.metadata().kind, SinkKind::Stream);
        }

        assert_eq!(sink.lines, vec!["INFO - hello".to_string()]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SinkKind::Stream.as_str(), "stream");
        assert_eq!(SinkKind::File.as_str(), "file");
    }
}
