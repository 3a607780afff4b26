//! 定义 SeverityRouter 的所有配置结构体。

use crate::core::formatter::{RecordFormatter, DEFAULT_TIMESTAMP_FORMAT};
use crate::core::level::Severity;
use crate::error::{Result, RouterError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}
fn default_min_level() -> String {
    "DEBUG".to_string()
}
fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

/// 文件 sink 的去重策略。
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachPolicy {
    /// 按大类去重：最多一个控制台 sink 和一个文件 sink，
    /// 第一个挂载的文件 sink 在路由器生命周期内一直生效。
    #[default]
    ByKind,
    /// 按类别去重：每个文件类别各自挂载一个文件 sink。
    ByCategory,
}

impl FromStr for AttachPolicy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "by_kind" | "bykind" => Ok(AttachPolicy::ByKind),
            "by_category" | "bycategory" => Ok(AttachPolicy::ByCategory),
            _ => Err(RouterError::config(format!("未知的挂载策略: {}", s))),
        }
    }
}

/// 控制台输出目标。
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

impl FromStr for ConsoleTarget {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stderr" => Ok(ConsoleTarget::Stderr),
            "stdout" => Ok(ConsoleTarget::Stdout),
            _ => Err(RouterError::config(format!("未知的控制台目标: {}", s))),
        }
    }
}

/// 控制台 sink 的配置。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub target: ConsoleTarget,
    #[serde(default = "default_false")]
    pub color_enabled: bool,
}

/// SeverityRouter 的顶层配置结构体。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_min_level")]
    pub min_level: String,
    #[serde(default)]
    pub attach_policy: AttachPolicy,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_false")]
    pub create_log_directory: bool,
    #[serde(default = "default_true")]
    pub capture_stack: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            min_level: default_min_level(),
            attach_policy: AttachPolicy::default(),
            console: ConsoleConfig::default(),
            timestamp_format: default_timestamp_format(),
            create_log_directory: default_false(),
            capture_stack: default_true(),
        }
    }
}

impl RouterConfig {
    /// 以指定日志目录创建默认配置
    pub fn with_log_directory<P: Into<PathBuf>>(log_directory: P) -> Self {
        Self {
            log_directory: log_directory.into(),
            ..Default::default()
        }
    }

    /// 解析最低级别
    pub fn min_severity(&self) -> Result<Severity> {
        self.min_level.parse()
    }
}

/// 用于从 TOML 文件加载 `RouterConfig` 的辅助函数。
pub fn load_config_from_file(path: &Path) -> Result<RouterConfig> {
    if !path.exists() {
        return Err(RouterError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = std::fs::read_to_string(path)?;
    load_config_from_str(&config_str)
}

/// 用于从 TOML 字符串加载 `RouterConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> Result<RouterConfig> {
    let config: RouterConfig = toml::from_str(config_str)?;
    Ok(config)
}

/// 验证配置的有效性。
pub fn validate_config(config: &RouterConfig) -> Result<()> {
    config.min_severity()?;

    if config.log_directory.as_os_str().is_empty() {
        return Err(RouterError::config("日志目录不能为空"));
    }

    RecordFormatter::validate_timestamp_format(&config.timestamp_format)?;

    Ok(())
}
