//! SeverityRouter - 按严重级别分流的日志库
//!
//! INFO 输出到控制台，DEBUG/WARNING 写入 `debug_and_warning.log`，
//! ERROR/CRITICAL 写入 `error_and_critical.log`。sink 在第一次需要时才创建，
//! 重复调用不会累积重复的 sink。
//!
//! # 快速开始
//!
//! ```rust
//! use severity_router::SeverityRouter;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::env::temp_dir().join("severity_router_doc_quickstart");
//!     std::fs::create_dir_all(&dir)?;
//!
//!     let logs = SeverityRouter::new(&dir);
//!     logs.info("Page requested...")?;
//!     logs.debug("Buttons found.")?;
//!     logs.warning("Element not found before timeout.")?;
//!     Ok(())
//! }
//! ```
//!
//! # 自定义配置
//!
//! ```rust
//! use severity_router::{AttachPolicy, SeverityRouter, Severity};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logs = SeverityRouter::builder()
//!         .log_directory(std::env::temp_dir().join("severity_router_doc_custom"))
//!         .create_log_directory(true)
//!         .attach_policy(AttachPolicy::ByCategory)
//!         .min_level(Severity::Info)
//!         .build()?;
//!
//!     logs.error("Access denied. Status code: 403.", false)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod env_config;
pub mod error;
pub mod router;
pub mod sinks;
pub mod utils;

// 重新导出主要类型
pub use config::{
    load_config_from_file, load_config_from_str, validate_config, AttachPolicy, ConsoleConfig,
    ConsoleTarget, RouterConfig,
};
pub use crate::core::{ErrorSnapshot, LogRecord, Severity, SeverityRouterLayer, StackSnapshot};
pub use diagnostics::DiagnosticsSnapshot;
pub use env_config::{apply_env_overrides, EnvConfig};
pub use error::{Result, RouterError};
pub use router::{ErrorScope, SeverityRouter, SeverityRouterBuilder};
pub use sinks::{CaptureBuffer, FileCategory, SinkKind, SinkMetadata};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 从配置文件创建路由器，并应用环境变量覆盖
///
/// 文件不存在时返回 `RouterError::ConfigFileMissing`。
pub fn router_from_file(path: &std::path::Path) -> Result<SeverityRouter> {
    let mut config = load_config_from_file(path)?;
    apply_env_overrides(&mut config)?;
    SeverityRouter::with_config(config)
}
