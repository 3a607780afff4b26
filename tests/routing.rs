//! 路由行为集成测试
//!
//! 覆盖 sink 去重、第一个文件 sink 生效、控制台不重复输出、目录缺失报错、
//! 写入顺序、写入失败的传播以及实例隔离。

use severity_router::{CaptureBuffer, FileCategory, RouterError, SeverityRouter, SinkKind};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const DEBUG_FILE: &str = "debug_and_warning.log";
const ERROR_FILE: &str = "error_and_critical.log";

fn router_with_console(dir: &Path) -> (SeverityRouter, CaptureBuffer) {
    let console = CaptureBuffer::new();
    let router = SeverityRouter::builder()
        .log_directory(dir)
        .console_writer(console.clone())
        .capture_stack(false)
        .build()
        .expect("valid configuration");
    (router, console)
}

fn record_lines(dir: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(dir.join(name))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_at_most_one_sink_per_kind() {
    let dir = TempDir::new().unwrap();
    let (router, _console) = router_with_console(dir.path());

    for round in 0..3 {
        let message = format!("round {}", round);
        router.info(&message).unwrap();
        router.debug(&message).unwrap();
        router.warning(&message).unwrap();
        router.error(&message, true).unwrap();
        router.critical(&message).unwrap();
    }

    assert_eq!(router.sink_count(SinkKind::Stream), 1);
    assert_eq!(router.sink_count(SinkKind::File), 1);
    assert_eq!(router.attached_sinks().len(), 2);
    assert_eq!(router.diagnostics().sinks_attached, 2);
}

#[test]
fn test_first_file_sink_wins_for_later_categories() {
    let dir = TempDir::new().unwrap();
    let (router, _console) = router_with_console(dir.path());

    router.debug("Buttons found.").unwrap();
    router.warning("Timeout while locating element.").unwrap();
    router.error("Access denied. Status code: 403.", true).unwrap();

    let lines = record_lines(dir.path(), DEBUG_FILE);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("DEBUG - Buttons found. - "));
    assert!(lines[1].starts_with("WARNING - Timeout while locating element. - "));
    assert!(lines[2].starts_with("ERROR - Access denied. Status code: 403. - "));

    assert!(!dir.path().join(ERROR_FILE).exists());
    assert_eq!(
        router.attached_file_categories(),
        vec![FileCategory::DebugWarning]
    );
}

#[test]
fn test_error_first_pins_error_file() {
    let dir = TempDir::new().unwrap();
    let (router, _console) = router_with_console(dir.path());

    router.critical("Bad request. Status code: 400.").unwrap();
    router.debug("after the fact").unwrap();

    let lines = record_lines(dir.path(), ERROR_FILE);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("DEBUG - after the fact - "));
    assert!(!dir.path().join(DEBUG_FILE).exists());
}

#[test]
fn test_info_lines_are_not_duplicated() {
    let dir = TempDir::new().unwrap();
    let (router, console) = router_with_console(dir.path());

    router.info("x").unwrap();
    router.info("y").unwrap();

    assert_eq!(console.lines(), vec!["INFO - x", "INFO - y"]);
}

#[test]
fn test_critical_without_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("logs");
    let router = SeverityRouter::new(&missing);

    let err = router.critical("boom").unwrap_err();
    assert!(matches!(err, RouterError::Configuration { ref path, .. } if path == &missing));
    assert!(!err.is_recoverable());
    assert!(!missing.exists());

    // 目录出现后同一个路由器可以正常挂载
    fs::create_dir(&missing).unwrap();
    router.critical("boom again").unwrap();
    let lines = record_lines(&missing, ERROR_FILE);
    assert!(lines[0].starts_with("CRITICAL - boom again - "));
}

#[test]
fn test_lines_read_back_in_call_order() {
    let dir = TempDir::new().unwrap();
    let (router, _console) = router_with_console(dir.path());

    let messages: Vec<String> = (0..50).map(|i| format!("message #{} ✓", i)).collect();
    for message in &messages {
        router.debug(message).unwrap();
    }
    router.flush().unwrap();

    let lines = record_lines(dir.path(), DEBUG_FILE);
    assert_eq!(lines.len(), messages.len());
    for (line, message) in lines.iter().zip(&messages) {
        assert!(line.starts_with(&format!("DEBUG - {} - ", message)));
    }
}

#[test]
fn test_routers_are_isolated() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let (router_a, console_a) = router_with_console(dir_a.path());
    let (router_b, console_b) = router_with_console(dir_b.path());

    router_a.debug("from a").unwrap();
    router_b.critical("from b").unwrap();
    router_a.info("console a").unwrap();

    assert!(record_lines(dir_a.path(), DEBUG_FILE)
        .iter()
        .all(|l| !l.contains("from b")));
    assert!(record_lines(dir_b.path(), ERROR_FILE)
        .iter()
        .all(|l| !l.contains("from a")));
    assert!(!dir_b.path().join(DEBUG_FILE).exists());
    assert_eq!(console_a.lines(), vec!["INFO - console a"]);
    assert!(console_b.lines().is_empty());
}

#[test]
fn test_concurrent_callers_share_one_file_sink() {
    let dir = TempDir::new().unwrap();
    let (router, _console) = router_with_console(dir.path());
    let router = Arc::new(router);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for i in 0..25 {
                    router.warning(&format!("thread {} line {}", t, i)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(router.sink_count(SinkKind::File), 1);
    let lines = record_lines(dir.path(), DEBUG_FILE);
    assert_eq!(lines.len(), 200);
    assert!(lines.iter().all(|l| l.starts_with("WARNING - thread ")));

    // 默认时间戳格式按字典序即时间序
    let timestamps: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.rsplit(" - ").next())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

/// 总是失败的控制台写入器
struct ClosedConsole;

impl Write for ClosedConsole {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn router_with_closed_console(dir: &Path) -> SeverityRouter {
    SeverityRouter::builder()
        .log_directory(dir)
        .console_writer(ClosedConsole)
        .capture_stack(false)
        .build()
        .expect("valid configuration")
}

#[test]
fn test_console_write_failure_reaches_caller() {
    let dir = TempDir::new().unwrap();
    let router = router_with_closed_console(dir.path());

    let err = router.info("x").unwrap_err();
    assert!(matches!(err, RouterError::Write { ref sink, .. } if sink == "console"));
    assert!(err.is_recoverable());

    let snapshot = router.diagnostics();
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(snapshot.records_emitted, 0);
    assert_eq!(router.sink_count(SinkKind::Stream), 1);

    // 失败的 sink 保持挂载，不会重复构造
    assert!(router.info("y").is_err());
    assert_eq!(router.diagnostics().write_errors, 2);
    assert_eq!(router.diagnostics().sinks_attached, 1);
}

#[test]
fn test_console_failure_does_not_stop_file_write() {
    let dir = TempDir::new().unwrap();
    let router = router_with_closed_console(dir.path());

    router.debug("Buttons found.").unwrap();
    let err = router.info("Page requested...").unwrap_err();
    assert!(matches!(err, RouterError::Write { ref sink, .. } if sink == "console"));

    let lines = record_lines(dir.path(), DEBUG_FILE);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("INFO - Page requested... - "));

    let snapshot = router.diagnostics();
    assert_eq!(snapshot.file_writes, 2);
    assert_eq!(snapshot.console_writes, 0);
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(router.attached_sinks().len(), 2);
}
