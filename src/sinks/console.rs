//! 控制台输出 Sink 实现
//!
//! 将记录以 `LEVEL - MESSAGE` 格式输出到标准错误（默认）、标准输出或调用方提供的写入器。

use crate::config::{ConsoleConfig, ConsoleTarget};
use crate::core::formatter::RecordFormatter;
use crate::core::record::LogRecord;
use crate::error::{Result, RouterError};
use crate::sinks::traits::{LogSink, SinkKind, SinkMetadata};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// 控制台输出目标
enum ConsoleOutput {
    Stderr,
    Stdout,
    Writer(Box<dyn Write + Send>),
}

impl ConsoleOutput {
    fn label(&self) -> &'static str {
        match self {
            ConsoleOutput::Stderr => "stderr",
            ConsoleOutput::Stdout => "stdout",
            ConsoleOutput::Writer(_) => "writer",
        }
    }
}

/// 控制台输出 Sink
pub struct ConsoleSink {
    output: ConsoleOutput,
    formatter: RecordFormatter,
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("output", &self.output.label())
            .field("formatter", &self.formatter)
            .finish()
    }
}

impl ConsoleSink {
    /// 根据配置创建控制台 Sink
    pub fn new(config: &ConsoleConfig) -> Self {
        let output = match config.target {
            ConsoleTarget::Stderr => ConsoleOutput::Stderr,
            ConsoleTarget::Stdout => ConsoleOutput::Stdout,
        };

        Self {
            output,
            formatter: RecordFormatter::console(config.color_enabled),
        }
    }

    /// 输出到调用方提供的写入器
    pub fn with_writer(writer: Box<dyn Write + Send>, color_enabled: bool) -> Self {
        Self {
            output: ConsoleOutput::Writer(writer),
            formatter: RecordFormatter::console(color_enabled),
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.output {
            ConsoleOutput::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{}", line)?;
                stderr.flush()
            }
            ConsoleOutput::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
                stdout.flush()
            }
            ConsoleOutput::Writer(ref mut writer) => {
                writeln!(writer, "{}", line)?;
                writer.flush()
            }
        }
    }
}

impl LogSink for ConsoleSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let formatted = self.formatter.format(record);
        self.write_line(&formatted)
            .map_err(|e| RouterError::write(self.name(), e))
    }

    fn flush(&mut self) -> Result<()> {
        let result = match self.output {
            ConsoleOutput::Stderr => io::stderr().flush(),
            ConsoleOutput::Stdout => io::stdout().flush(),
            ConsoleOutput::Writer(ref mut writer) => writer.flush(),
        };
        result.map_err(|e| RouterError::write(self.name(), e))
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Stream
    }

    fn name(&self) -> &'static str {
        "console"
    }

    fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata {
            name: self.name().to_string(),
            kind: self.kind(),
            description: Some(self.output.label().to_string()),
        }
    }
}

/// 内存捕获缓冲区
///
/// 可克隆的写入器，所有克隆共享同一块缓冲区。用于把控制台输出
/// 重定向到内存，便于宿主程序或测试检查输出内容。
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 UTF-8 文本返回已捕获的内容
    pub fn contents(&self) -> String {
        match self.inner.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// 按行拆分已捕获的内容
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Severity;

    /// 总是失败的写入器
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_sink_writes_one_line_per_record() {
        let buffer = CaptureBuffer::new();
        let mut sink = ConsoleSink::with_writer(Box::new(buffer.clone()), false);

        sink.emit(&LogRecord::new(Severity::Info, "x")).unwrap();
        sink.emit(&LogRecord::new(Severity::Info, "y")).unwrap();

        assert_eq!(buffer.lines(), vec!["INFO - x", "INFO - y"]);
    }

    #[test]
    fn test_console_sink_write_error() {
        let mut sink = ConsoleSink::with_writer(Box::new(BrokenPipe), false);

        let err = sink
            .emit(&LogRecord::new(Severity::Info, "lost"))
            .unwrap_err();
        assert!(matches!(err, RouterError::Write { ref sink, .. } if sink == "console"));
    }

    #[test]
    fn test_console_sink_metadata() {
        let sink = ConsoleSink::new(&ConsoleConfig::default());
        let metadata = sink.metadata();
        assert_eq!(metadata.kind, SinkKind::Stream);
        assert_eq!(metadata.description.as_deref(), Some("stderr"));

        let sink = ConsoleSink::new(&ConsoleConfig {
            target: ConsoleTarget::Stdout,
            color_enabled: false,
        });
        assert_eq!(sink.metadata().description.as_deref(), Some("stdout"));
    }
}
