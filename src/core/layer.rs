//! tracing 桥接层
//!
//! 此层将 tracing 事件转发到一个 `SeverityRouter`，使已经使用 `tracing` 宏的宿主程序
//! 无需改动调用点即可获得按级别分流的输出。

use crate::core::level::Severity;
use crate::router::SeverityRouter;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// 本 crate 自身诊断日志的 target，转发时跳过以免递归
const INTERNAL_TARGET: &str = env!("CARGO_CRATE_NAME");

/// tracing 桥接层
#[derive(Debug, Clone)]
pub struct SeverityRouterLayer {
    router: Arc<SeverityRouter>,
    dropped: Arc<AtomicU64>,
}

impl SeverityRouterLayer {
    /// 创建新的桥接层
    pub fn new(router: Arc<SeverityRouter>) -> Self {
        Self {
            router,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 目标路由器
    pub fn router(&self) -> &Arc<SeverityRouter> {
        &self.router
    }

    /// 因路由器返回错误而未写出的事件数
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// tracing 级别到路由器级别的映射
    pub fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR => Severity::Error,
        }
    }

    fn is_internal(target: &str) -> bool {
        target == INTERNAL_TARGET
            || target
                .strip_prefix(INTERNAL_TARGET)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl<S> Layer<S> for SeverityRouterLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if Self::is_internal(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let severity = Self::severity_for(metadata.level());
        if self.router.log(severity, &visitor.finish()).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// 提取 `message` 字段，其余字段以 `key=value` 形式追加
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
