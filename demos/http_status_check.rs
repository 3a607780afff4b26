//! SeverityRouter 使用示例
//!
//! 模拟一个 HTTP 冒烟测试脚本：按状态码选择日志级别。状态码来自固定表，
//! 不发起真实网络请求。运行后查看 `logs/` 目录和标准错误输出。
//!
//! ```text
//! cargo run --example http_status_check
//! ```

use anyhow::Context;
use severity_router::{apply_env_overrides, RouterConfig, SeverityRouter, SeverityRouterLayer};
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

/// 探测失败
#[derive(Debug)]
struct StatusError {
    address: &'static str,
    status: u16,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} answered with status {}", self.address, self.status)
    }
}

impl std::error::Error for StatusError {}

const RESPONSES: &[(&str, u16)] = &[
    ("https://httpbin.org/status/404", 404),
    ("https://httpbin.org/status/500", 500),
    ("https://httpbin.org/status/403", 403),
    ("https://httpbin.org/status/400", 400),
    ("https://example.org/", 200),
];

fn main() -> anyhow::Result<()> {
    let mut config = RouterConfig::default();
    config.create_log_directory = true;
    apply_env_overrides(&mut config).context("读取环境变量失败")?;

    let logs = Arc::new(SeverityRouter::with_config(config).context("配置无效")?);
    println!("日志目录: {}", logs.log_directory().display());

    for &(address, status) in RESPONSES {
        let failure = StatusError { address, status };
        match status {
            200 => logs.info(&format!(
                "Successful connection to {} with status code {}.",
                address, status
            ))?,
            404 => logs.warning(&format!(
                "Resource not found at {}. Status code: {}.",
                address, status
            ))?,
            500 => logs
                .with_error(&failure)
                .warning(&format!("Server error at {}. Status code: {}.", address, status))?,
            403 => logs.error(
                &format!("Access denied at {}. Status code: {}.", address, status),
                false,
            )?,
            _ => logs
                .with_error(&failure)
                .critical(&format!("Bad request to {}. Status code: {}.", address, status))?,
        }
    }

    // 已经使用 tracing 宏的代码可以通过桥接层复用同一个路由器
    let subscriber = tracing_subscriber::registry().with(SeverityRouterLayer::new(Arc::clone(&logs)));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "status_check", attempts = RESPONSES.len(), "status check finished");
    });

    logs.flush()?;

    let snapshot = logs.diagnostics();
    println!(
        "已写出 {} 条记录，挂载 {} 个 sink，失败 {} 次",
        snapshot.records_emitted,
        snapshot.sinks_attached,
        snapshot.total_errors()
    );
    for sink in logs.attached_sinks() {
        println!(
            "  {} ({}) -> {}",
            sink.name,
            sink.kind.as_str(),
            sink.description.unwrap_or_default()
        );
    }

    Ok(())
}
