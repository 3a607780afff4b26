//! SeverityRouter 核心模块
//!
//! 包含级别、记录、格式化以及 tracing 桥接层。

pub mod formatter;
pub mod layer;
pub mod level;
pub mod record;

pub use formatter::{FormatStyle, RecordFormatter, DEFAULT_TIMESTAMP_FORMAT};
pub use layer::SeverityRouterLayer;
pub use level::Severity;
pub use record::{ErrorSnapshot, LogRecord, StackSnapshot};
