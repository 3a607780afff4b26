//! 日志记录定义
//!
//! 此模块定义了路由器处理的记录结构，以及附加在记录上的错误快照和调用栈快照。

use crate::core::level::Severity;
use chrono::{DateTime, Local};
use std::backtrace::Backtrace;
use std::error::Error as StdError;

/// 日志记录
///
/// 每次日志调用生成一条记录，时间戳在创建时以本地时间捕获。
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// 严重级别
    pub severity: Severity,
    /// 日志消息
    pub message: String,
    /// 本地时间戳
    pub timestamp: DateTime<Local>,
    /// 错误快照
    pub error: Option<ErrorSnapshot>,
    /// 调用栈快照
    pub stack: Option<StackSnapshot>,
}

impl LogRecord {
    /// 创建新的日志记录
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Local::now(),
            error: None,
            stack: None,
        }
    }

    /// 附加错误快照
    pub fn with_error(mut self, error: ErrorSnapshot) -> Self {
        self.error = Some(error);
        self
    }

    /// 附加调用栈快照
    pub fn with_stack(mut self, stack: StackSnapshot) -> Self {
        self.stack = Some(stack);
        self
    }

    /// 使用指定时间戳（测试和重放时使用）
    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// 错误快照
///
/// 记录错误本身的描述以及 `source()` 链上每个原因的描述。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSnapshot {
    /// 错误描述
    pub message: String,
    /// 原因链，由近及远
    pub causes: Vec<String>,
}

impl ErrorSnapshot {
    /// 从活动错误捕获快照
    pub fn capture(error: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            causes,
        }
    }

    /// 渲染为多行文本
    pub fn render(&self) -> String {
        let mut result = format!("Error: {}", self.message);
        for cause in &self.causes {
            result.push_str("\nCaused by: ");
            result.push_str(cause);
        }
        result
    }
}

/// 调用栈快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSnapshot {
    frames: String,
}

impl StackSnapshot {
    /// 标题行
    pub const HEADER: &'static str = "Stack (most recent call last):";

    /// 捕获当前线程的调用栈
    ///
    /// 不受 `RUST_BACKTRACE` 影响，总是捕获。
    pub fn capture() -> Self {
        Self {
            frames: Backtrace::force_capture().to_string(),
        }
    }

    /// 从已有文本构造快照
    pub fn from_text(frames: impl Into<String>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// 调用栈文本
    pub fn frames(&self) -> &str {
        &self.frames
    }

    /// 渲染为多行文本
    pub fn render(&self) -> String {
        format!("{}\n{}", Self::HEADER, self.frames.trim_end())
    }
}
