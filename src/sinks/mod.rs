//! SeverityRouter Sinks 模块
//!
//! 提供控制台和文件两类输出目标，以及路由器用来去重的已挂载 sink 表。

pub mod console;
pub mod file;
pub mod table;
pub mod traits;

// 重新导出主要类型
pub use console::{CaptureBuffer, ConsoleSink};
pub use file::{FileCategory, FileSink};
pub use table::{SinkRequest, SinkTable};
pub use traits::{LogSink, SinkKind, SinkMetadata};
