//! 文件输出 Sink 实现
//!
//! 每个文件 sink 绑定一个类别，类别决定日志目录下的固定文件名。
//! 文件以追加模式打开，句柄在 sink 生命周期内保持打开，每条记录写完即刷新。

use crate::core::formatter::RecordFormatter;
use crate::core::level::Severity;
use crate::core::record::LogRecord;
use crate::error::{Result, RouterError};
use crate::sinks::traits::{LogSink, SinkKind, SinkMetadata};
use crate::utils::FileTools;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// DEBUG 和 WARNING
    DebugWarning,
    /// ERROR 和 CRITICAL
    ErrorCritical,
}

impl FileCategory {
    /// 类别绑定的文件名
    pub fn file_name(&self) -> &'static str {
        match self {
            FileCategory::DebugWarning => "debug_and_warning.log",
            FileCategory::ErrorCritical => "error_and_critical.log",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::DebugWarning => "debug_warning",
            FileCategory::ErrorCritical => "error_critical",
        }
    }

    /// 级别对应的文件类别，INFO 只走控制台，没有类别
    pub fn for_severity(severity: Severity) -> Option<Self> {
        match severity {
            Severity::Info => None,
            Severity::Debug | Severity::Warning => Some(FileCategory::DebugWarning),
            Severity::Error | Severity::Critical => Some(FileCategory::ErrorCritical),
        }
    }
}

/// 文件输出 Sink
#[derive(Debug)]
pub struct FileSink {
    category: FileCategory,
    path: PathBuf,
    writer: BufWriter<File>,
    formatter: RecordFormatter,
}

impl FileSink {
    /// 在日志目录下打开类别对应的文件
    ///
    /// 目录缺失或不可写时返回 `RouterError::Configuration`，且不会留下任何文件。
    /// `create_directory` 为真时先创建目录。
    pub fn open(
        directory: &Path,
        category: FileCategory,
        formatter: RecordFormatter,
        create_directory: bool,
    ) -> Result<Self> {
        if create_directory {
            FileTools::ensure_directory_exists(directory)?;
        } else {
            FileTools::check_directory(directory)?;
        }

        let path = directory.join(category.file_name());
        let file =
            FileTools::open_file_append(&path).map_err(|e| RouterError::directory(directory, e))?;

        Ok(Self {
            category,
            path,
            writer: BufWriter::new(file),
            formatter,
        })
    }

    /// 绑定的文件类别
    pub fn category(&self) -> FileCategory {
        self.category
    }

    /// 当前文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&mut self, formatted: &str) -> std::io::Result<()> {
        self.writer.write_all(formatted.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl LogSink for FileSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let formatted = self.formatter.format(record);
        self.write_record(&formatted)
            .map_err(|e| RouterError::write(format!("file:{}", self.category.as_str()), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| RouterError::write(format!("file:{}", self.category.as_str()), e))
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn name(&self) -> &'static str {
        match self.category {
            FileCategory::DebugWarning => "file:debug_warning",
            FileCategory::ErrorCritical => "file:error_critical",
        }
    }

    fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata {
            name: self.name().to_string(),
            kind: self.kind(),
            description: Some(self.path.display().to_string()),
        }
    }
}
