//! 按严重级别路由的日志器
//!
//! `SeverityRouter` 持有自己的 sink 表，首次用到某个大类时才挂载对应的 sink：
//!
//! | 操作 | sink | 文件 | 附加上下文 |
//! |---|---|---|---|
//! | `info` | 控制台 | — | 无 |
//! | `debug` | 文件 | debug_and_warning.log | 无 |
//! | `warning` | 文件 | debug_and_warning.log | 活动错误 |
//! | `error` | 文件 | error_and_critical.log | 活动错误（可选）、调用栈 |
//! | `critical` | 文件 | error_and_critical.log | 活动错误、调用栈 |
//!
//! 默认策略下文件 sink 按大类去重：第一个挂载的文件 sink 在路由器生命周期内
//! 一直生效，之后的 `error` / `critical` 也写入它。记录会经过所有已挂载的 sink，
//! 每个 sink 用自己绑定的格式化器渲染。
//!
//! # 示例
//!
//! ```rust
//! use severity_router::SeverityRouter;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::env::temp_dir().join("severity_router_doc_router");
//!     std::fs::create_dir_all(&dir)?;
//!
//!     let router = SeverityRouter::new(&dir);
//!     router.debug("Buttons found.")?;
//!     router.warning("Element not found before timeout.")?;
//!     Ok(())
//! }
//! ```

use crate::config::{validate_config, RouterConfig};
use crate::core::formatter::RecordFormatter;
use crate::core::level::Severity;
use crate::core::record::{ErrorSnapshot, LogRecord, StackSnapshot};
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::error::{Result, RouterError};
use crate::sinks::console::ConsoleSink;
use crate::sinks::file::{FileCategory, FileSink};
use crate::sinks::table::{SinkRequest, SinkTable};
use crate::sinks::traits::{LogSink, SinkKind, SinkMetadata};
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::Local;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 锁内状态
struct RouterState {
    table: SinkTable,
    /// 构建器提供的控制台写入器，挂载控制台 sink 时取走
    console_writer: Option<Box<dyn Write + Send>>,
}

/// 按严重级别路由的日志器
///
/// 每个实例拥有独立的 sink 表，两个实例之间不会共享 sink。
/// 实例是 `Send + Sync` 的，可以放在 `Arc` 中跨线程共享；
/// 检查、挂载和写入都在同一把锁内完成。
pub struct SeverityRouter {
    config: RouterConfig,
    min_level: Severity,
    state: Mutex<RouterState>,
    diagnostics: Diagnostics,
}

impl fmt::Debug for SeverityRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeverityRouter")
            .field("log_directory", &self.config.log_directory)
            .field("min_level", &self.min_level)
            .field("attach_policy", &self.config.attach_policy)
            .finish()
    }
}

/// 一次调用需要附加的上下文
#[derive(Clone, Copy)]
struct CallContext<'e> {
    active_error: Option<&'e (dyn StdError + 'static)>,
    include_error: bool,
    include_stack: bool,
}

/// 锁内操作的结果，锁释放后再输出内部诊断日志
struct Outcome {
    attached: Option<SinkMetadata>,
    result: Result<()>,
}

impl SeverityRouter {
    /// 以日志目录创建路由器
    ///
    /// 不检查目录，目录问题在第一次创建文件 sink 时返回给调用方。
    pub fn new<P: Into<PathBuf>>(log_directory: P) -> Self {
        let config = RouterConfig::with_log_directory(log_directory);
        Self::from_parts(config, Severity::LOWEST, None)
    }

    /// 使用指定配置创建路由器
    pub fn with_config(config: RouterConfig) -> Result<Self> {
        validate_config(&config)?;
        let min_level = config.min_severity()?;
        Ok(Self::from_parts(config, min_level, None))
    }

    /// 创建路由器构建器
    pub fn builder() -> SeverityRouterBuilder {
        SeverityRouterBuilder {
            config: RouterConfig::default(),
            console_writer: None,
        }
    }

    fn from_parts(
        config: RouterConfig,
        min_level: Severity,
        console_writer: Option<Box<dyn Write + Send>>,
    ) -> Self {
        let table = SinkTable::new(config.attach_policy);
        Self {
            config,
            min_level,
            state: Mutex::new(RouterState {
                table,
                console_writer,
            }),
            diagnostics: Diagnostics::new(),
        }
    }

    /// INFO：输出到控制台
    pub fn info(&self, message: &str) -> Result<()> {
        self.dispatch(Severity::Info, message, CallContext::plain())
    }

    /// DEBUG：输出到 debug_and_warning.log
    pub fn debug(&self, message: &str) -> Result<()> {
        self.dispatch(Severity::Debug, message, CallContext::plain())
    }

    /// WARNING：输出到 debug_and_warning.log
    pub fn warning(&self, message: &str) -> Result<()> {
        self.dispatch(Severity::Warning, message, CallContext::with_error(None))
    }

    /// ERROR：输出到 error_and_critical.log，附带调用栈
    ///
    /// `include_error` 控制是否附带活动错误；直接在路由器上调用时没有活动错误，
    /// 参见 [`SeverityRouter::with_error`]。
    pub fn error(&self, message: &str, include_error: bool) -> Result<()> {
        self.dispatch(
            Severity::Error,
            message,
            CallContext::with_error_and_stack(None, include_error),
        )
    }

    /// CRITICAL：输出到 error_and_critical.log，附带调用栈
    pub fn critical(&self, message: &str) -> Result<()> {
        self.dispatch(
            Severity::Critical,
            message,
            CallContext::with_error_and_stack(None, true),
        )
    }

    /// 按级别分派到对应操作，ERROR 总是附带活动错误
    pub fn log(&self, severity: Severity, message: &str) -> Result<()> {
        match severity {
            Severity::Debug => self.debug(message),
            Severity::Info => self.info(message),
            Severity::Warning => self.warning(message),
            Severity::Error => self.error(message, true),
            Severity::Critical => self.critical(message),
        }
    }

    /// 将错误设为活动错误，返回的作用域内的记录会附带它的快照
    ///
    /// ```rust
    /// use severity_router::SeverityRouter;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let dir = std::env::temp_dir().join("severity_router_doc_scope");
    ///     std::fs::create_dir_all(&dir)?;
    ///     let router = SeverityRouter::new(&dir);
    ///
    ///     if let Err(e) = std::fs::read_to_string(dir.join("missing.txt")) {
    ///         router.with_error(&e).critical("Exception: an error occurred.")?;
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn with_error<'a>(&'a self, error: &'a (dyn StdError + 'static)) -> ErrorScope<'a> {
        ErrorScope {
            router: self,
            error,
        }
    }

    /// 刷新所有已挂载的 sink
    pub fn flush(&self) -> Result<()> {
        let mut state = self.lock_state();
        let mut first_error = None;
        for sink in state.table.all_mut() {
            if let Err(e) = sink.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// 已挂载 sink 的元数据
    pub fn attached_sinks(&self) -> Vec<SinkMetadata> {
        self.lock_state().table.metadata()
    }

    /// 指定大类已挂载的 sink 数
    pub fn sink_count(&self, kind: SinkKind) -> usize {
        self.lock_state().table.count(kind)
    }

    /// 已挂载的文件类别，按挂载顺序
    pub fn attached_file_categories(&self) -> Vec<FileCategory> {
        self.lock_state().table.file_categories()
    }

    /// 诊断数据快照
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// 日志目录
    pub fn log_directory(&self) -> &Path {
        &self.config.log_directory
    }

    /// 最低级别
    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// 当前配置
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// 写入失败不会让 sink 表处于半更新状态，锁中毒时直接沿用内部状态
    fn lock_state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, severity: Severity, message: &str, context: CallContext<'_>) -> Result<()> {
        if severity < self.min_level {
            self.diagnostics.increment_records_filtered();
            return Ok(());
        }

        let record = self.build_record(severity, message, context);
        let request = match FileCategory::for_severity(severity) {
            Some(category) => SinkRequest::File(category),
            None => SinkRequest::Console,
        };

        // 时间戳在锁内确定，文件中的行序与时间戳顺序一致
        let outcome = {
            let mut state = self.lock_state();
            let record = record.at(Local::now());
            self.attach_and_emit(&mut state, request, &record)
        };

        if let Some(ref metadata) = outcome.attached {
            tracing::debug!(
                sink = %metadata.name,
                target_path = ?metadata.description,
                "sink attached"
            );
        }

        match outcome.result {
            Ok(()) => {
                self.diagnostics.increment_records_emitted();
                Ok(())
            }
            Err(e) => {
                if matches!(e, RouterError::Configuration { .. }) {
                    self.diagnostics.increment_configuration_errors();
                } else {
                    self.diagnostics.increment_write_errors();
                }
                tracing::warn!(
                    level = %severity,
                    category = e.category(),
                    "log record not written: {}",
                    e
                );
                Err(e)
            }
        }
    }

    fn build_record(
        &self,
        severity: Severity,
        message: &str,
        context: CallContext<'_>,
    ) -> LogRecord {
        let mut record = LogRecord::new(severity, message);

        if context.include_error {
            if let Some(error) = context.active_error {
                record = record.with_error(ErrorSnapshot::capture(error));
            }
        }

        if context.include_stack && self.config.capture_stack {
            record = record.with_stack(StackSnapshot::capture());
        }

        record
    }

    /// 锁内完成：检查是否已满足、必要时挂载、写入所有目标 sink
    fn attach_and_emit(
        &self,
        state: &mut RouterState,
        request: SinkRequest,
        record: &LogRecord,
    ) -> Outcome {
        let mut attached = None;

        if !state.table.satisfies(request) {
            match self.build_sink(state, request) {
                Ok(Built::Console(sink)) => {
                    let metadata = sink.metadata();
                    if state.table.attach_console(sink) {
                        attached = Some(metadata);
                    }
                }
                Ok(Built::File(sink)) => {
                    let metadata = sink.metadata();
                    if state.table.attach_file(sink) {
                        attached = Some(metadata);
                    }
                }
                Err(e) => {
                    return Outcome {
                        attached: None,
                        result: Err(e),
                    }
                }
            }
            if attached.is_some() {
                self.diagnostics.increment_sinks_attached();
            }
        }

        let mut first_error = None;
        for sink in state.table.targets_for(record) {
            match sink.emit(record) {
                Ok(()) => match sink.kind() {
                    SinkKind::Stream => self.diagnostics.increment_console_writes(),
                    SinkKind::File => self.diagnostics.increment_file_writes(),
                },
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        Outcome {
            attached,
            result: first_error.map_or(Ok(()), Err),
        }
    }

    fn build_sink(&self, state: &mut RouterState, request: SinkRequest) -> Result<Built> {
        match request {
            SinkRequest::Console => {
                let sink = match state.console_writer.take() {
                    Some(writer) => {
                        ConsoleSink::with_writer(writer, self.config.console.color_enabled)
                    }
                    None => ConsoleSink::new(&self.config.console),
                };
                Ok(Built::Console(sink))
            }
            SinkRequest::File(category) => {
                let sink = FileSink::open(
                    &self.config.log_directory,
                    category,
                    RecordFormatter::file(self.config.timestamp_format.as_str()),
                    self.config.create_log_directory,
                )?;
                Ok(Built::File(sink))
            }
        }
    }
}

/// 新建但尚未挂载的 sink
enum Built {
    Console(ConsoleSink),
    File(FileSink),
}

impl<'e> CallContext<'e> {
    fn plain() -> Self {
        Self {
            active_error: None,
            include_error: false,
            include_stack: false,
        }
    }

    fn with_error(active_error: Option<&'e (dyn StdError + 'static)>) -> Self {
        Self {
            active_error,
            include_error: true,
            include_stack: false,
        }
    }

    fn with_error_and_stack(
        active_error: Option<&'e (dyn StdError + 'static)>,
        include_error: bool,
    ) -> Self {
        Self {
            active_error,
            include_error,
            include_stack: true,
        }
    }
}

/// 带活动错误的日志作用域
///
/// 由 [`SeverityRouter::with_error`] 创建，提供与路由器相同的五个操作。
pub struct ErrorScope<'a> {
    router: &'a SeverityRouter,
    error: &'a (dyn StdError + 'static),
}

impl<'a> ErrorScope<'a> {
    /// INFO 不附带错误
    pub fn info(&self, message: &str) -> Result<()> {
        self.router.info(message)
    }

    /// DEBUG 不附带错误
    pub fn debug(&self, message: &str) -> Result<()> {
        self.router.debug(message)
    }

    pub fn warning(&self, message: &str) -> Result<()> {
        self.router.dispatch(
            Severity::Warning,
            message,
            CallContext::with_error(Some(self.error)),
        )
    }

    pub fn error(&self, message: &str, include_error: bool) -> Result<()> {
        self.router.dispatch(
            Severity::Error,
            message,
            CallContext::with_error_and_stack(Some(self.error), include_error),
        )
    }

    pub fn critical(&self, message: &str) -> Result<()> {
        self.router.dispatch(
            Severity::Critical,
            message,
            CallContext::with_error_and_stack(Some(self.error), true),
        )
    }
}

/// 路由器构建器
pub struct SeverityRouterBuilder {
    config: RouterConfig,
    console_writer: Option<Box<dyn Write + Send>>,
}

impl SeverityRouterBuilder {
    /// 使用完整配置
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn log_directory<P: Into<PathBuf>>(mut self, log_directory: P) -> Self {
        self.config.log_directory = log_directory.into();
        self
    }

    pub fn min_level(mut self, level: Severity) -> Self {
        self.config.min_level = level.as_str().to_string();
        self
    }

    pub fn attach_policy(mut self, policy: crate::config::AttachPolicy) -> Self {
        self.config.attach_policy = policy;
        self
    }

    pub fn timestamp_format<S: Into<String>>(mut self, format: S) -> Self {
        self.config.timestamp_format = format.into();
        self
    }

    pub fn create_log_directory(mut self, create: bool) -> Self {
        self.config.create_log_directory = create;
        self
    }

    pub fn capture_stack(mut self, capture: bool) -> Self {
        self.config.capture_stack = capture;
        self
    }

    pub fn color_enabled(mut self, enabled: bool) -> Self {
        self.config.console.color_enabled = enabled;
        self
    }

    /// 控制台 sink 输出到指定写入器，而不是标准错误/标准输出
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// 构建路由器
    pub fn build(self) -> Result<SeverityRouter> {
        validate_config(&self.config)?;
        let min_level = self.config.min_severity()?;
        Ok(SeverityRouter::from_parts(
            self.config,
            min_level,
            self.console_writer,
        ))
    }
}
