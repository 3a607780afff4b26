//! 记录格式化
//!
//! 控制台格式为 `LEVEL - MESSAGE`，文件格式为 `LEVEL - MESSAGE - TIMESTAMP`。
//! 错误快照和调用栈快照作为附加行跟在记录行之后。

use crate::core::level::Severity;
use crate::core::record::LogRecord;
use crate::error::{Result, RouterError};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::fmt::Write as _;

/// 默认时间戳格式（本地时间，毫秒精度）
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// 格式风格
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatStyle {
    /// `LEVEL - MESSAGE`
    Console,
    /// `LEVEL - MESSAGE - TIMESTAMP`
    File,
}

/// 记录格式化器
///
/// 每个 sink 绑定一个格式化器，记录总是由实际接收它的 sink 的格式化器渲染。
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    style: FormatStyle,
    timestamp_format: String,
    color_enabled: bool,
}

impl RecordFormatter {
    /// 控制台格式化器
    pub fn console(color_enabled: bool) -> Self {
        Self {
            style: FormatStyle::Console,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            color_enabled,
        }
    }

    /// 文件格式化器
    pub fn file(timestamp_format: impl Into<String>) -> Self {
        Self {
            style: FormatStyle::File,
            timestamp_format: timestamp_format.into(),
            color_enabled: false,
        }
    }

    /// 格式风格
    pub fn style(&self) -> &FormatStyle {
        &self.style
    }

    /// 格式化记录，不含结尾换行
    pub fn format(&self, record: &LogRecord) -> String {
        let level = self.level_label(record.severity);

        let mut result = match self.style {
            FormatStyle::Console => format!("{} - {}", level, record.message),
            FormatStyle::File => format!(
                "{} - {} - {}",
                level,
                record.message,
                self.render_timestamp(&record.timestamp)
            ),
        };

        if let Some(ref error) = record.error {
            result.push('\n');
            result.push_str(&error.render());
        }

        if let Some(ref stack) = record.stack {
            result.push('\n');
            result.push_str(&stack.render());
        }

        result
    }

    /// 渲染时间戳；格式无法渲染时退回默认格式
    fn render_timestamp(&self, timestamp: &DateTime<Local>) -> String {
        render_with(timestamp, &self.timestamp_format).unwrap_or_else(|| {
            timestamp.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
        })
    }

    fn level_label(&self, severity: Severity) -> String {
        if !self.color_enabled {
            return severity.as_str().to_string();
        }

        let label = severity.as_str();
        match severity {
            Severity::Debug => label.blue().to_string(),
            Severity::Info => label.green().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Error => label.red().to_string(),
            Severity::Critical => label.red().bold().to_string(),
        }
    }

    /// 检查时间戳格式是否可被 chrono 解析并渲染
    ///
    /// 部分说明符（如 `%#z`）只能用于解析，渲染时会失败，这里用当前时间试渲染一次。
    pub fn validate_timestamp_format(format: &str) -> Result<()> {
        if format.trim().is_empty() {
            return Err(RouterError::config("时间戳格式不能为空"));
        }

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(RouterError::config(format!("无效的时间戳格式: {}", format)));
        }

        if render_with(&Local::now(), format).is_none() {
            return Err(RouterError::config(format!("时间戳格式无法渲染: {}", format)));
        }

        Ok(())
    }
}

fn render_with(timestamp: &DateTime<Local>, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", timestamp.format(format)).ok()?;
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{ErrorSnapshot, StackSnapshot};
    use chrono::{Local, TimeZone};

    fn fixed_record(severity: Severity, message: &str) -> LogRecord {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        LogRecord::new(severity, message).at(timestamp)
    }

    #[test]
    fn test_console_format() {
        let formatter = RecordFormatter::console(false);
        let record = fixed_record(Severity::Info, "Page requested...");
        assert_eq!(formatter.format(&record), "INFO - Page requested...");
    }

    #[test]
    fn test_file_format() {
        let formatter = RecordFormatter::file(DEFAULT_TIMESTAMP_FORMAT);
        let record = fixed_record(Severity::Debug, "Buttons found.");
        assert_eq!(
            formatter.format(&record),
            "DEBUG - Buttons found. - 2024-03-09 14:05:07,000"
        );
    }

    #[test]
    fn test_trailers_follow_record_line() {
        let formatter = RecordFormatter::file("%H:%M:%S");
        let record = fixed_record(Severity::Critical, "boom")
            .with_error(ErrorSnapshot {
                message: "timed out".to_string(),
                causes: vec![],
            })
            .with_stack(StackSnapshot::from_text("   0: scraper::run"));

        let text = formatter.format(&record);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CRITICAL - boom - 14:05:07",
                "Error: timed out",
                "Stack (most recent call last):",
                "   0: scraper::run",
            ]
        );
    }

    #[test]
    fn test_colored_console_keeps_message() {
        let formatter = RecordFormatter::console(true);
        let record = fixed_record(Severity::Error, "denied");
        let text = formatter.format(&record);
        assert!(text.contains("ERROR"));
        assert!(text.ends_with(" - denied"));
    }

    #[test]
    fn test_validate_timestamp_format() {
        assert!(RecordFormatter::validate_timestamp_format(DEFAULT_TIMESTAMP_FORMAT).is_ok());
        assert!(RecordFormatter::validate_timestamp_format("%Y-%m-%d").is_ok());
        assert!(RecordFormatter::validate_timestamp_format("%Y %").is_err());
        assert!(RecordFormatter::validate_timestamp_format("  ").is_err());
        // 只能用于解析的说明符
        assert!(RecordFormatter::validate_timestamp_format("%#z").is_err());
    }

    #[test]
    fn test_unrenderable_format_falls_back() {
        let formatter = RecordFormatter::file("%#z");
        assert_eq!(formatter.style(), &FormatStyle::File);
        let record = fixed_record(Severity::Warning, "slow page");
        assert_eq!(
            formatter.format(&record),
            "WARNING - slow page - 2024-03-09 14:05:07,000"
        );
    }
}
