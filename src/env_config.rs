//! 环境变量配置模块
//!
//! 此模块提供从环境变量覆盖路由器配置的功能，方便宿主脚本在不修改配置文件的情况下切换日志目录或级别。

use crate::config::{AttachPolicy, ConsoleTarget, RouterConfig};
use crate::core::level::Severity;
use crate::error::Result;
use std::env;
use std::path::PathBuf;

/// 日志目录
pub const ENV_LOG_DIR: &str = "SEVERITY_ROUTER_LOG_DIR";
/// 最低级别
pub const ENV_MIN_LEVEL: &str = "SEVERITY_ROUTER_MIN_LEVEL";
/// 挂载策略
pub const ENV_ATTACH_POLICY: &str = "SEVERITY_ROUTER_ATTACH_POLICY";
/// 控制台目标
pub const ENV_CONSOLE: &str = "SEVERITY_ROUTER_CONSOLE";

/// 环境变量配置管理器
pub struct EnvConfig;

impl EnvConfig {
    fn read(key: &str) -> Option<String> {
        env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// 从环境变量读取日志目录
    pub fn get_log_directory() -> Option<PathBuf> {
        Self::read(ENV_LOG_DIR).map(PathBuf::from)
    }

    /// 从环境变量读取最低级别
    pub fn get_min_level() -> Result<Option<Severity>> {
        Self::read(ENV_MIN_LEVEL).map(|s| s.parse()).transpose()
    }

    /// 从环境变量读取挂载策略
    pub fn get_attach_policy() -> Result<Option<AttachPolicy>> {
        Self::read(ENV_ATTACH_POLICY).map(|s| s.parse()).transpose()
    }

    /// 从环境变量读取控制台目标
    pub fn get_console_target() -> Result<Option<ConsoleTarget>> {
        Self::read(ENV_CONSOLE).map(|s| s.parse()).transpose()
    }
}

/// 将存在且非空的环境变量覆盖到配置上
///
/// 任一变量无法解析时返回错误，配置保持不变。
pub fn apply_env_overrides(config: &mut RouterConfig) -> Result<()> {
    let min_level = EnvConfig::get_min_level()?;
    let attach_policy = EnvConfig::get_attach_policy()?;
    let console_target = EnvConfig::get_console_target()?;

    if let Some(directory) = EnvConfig::get_log_directory() {
        config.log_directory = directory;
    }
    if let Some(level) = min_level {
        config.min_level = level.as_str().to_string();
    }
    if let Some(policy) = attach_policy {
        config.attach_policy = policy;
    }
    if let Some(target) = console_target {
        config.console.target = target;
    }

    Ok(())
}
