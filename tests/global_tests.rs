//! Process-wide initialization
//!
//! Everything runs in one test because the registry is shared by the whole
//! test binary.

use rust_logger_facade::{
    self as facade, catch_exception, with_app_name, with_error_file_name, with_level,
    with_log_file_dir, Field, LogLevel,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_global_lifecycle() {
    // Before initialization: bootstrap console, set_level and sync are no-ops
    facade::info("before init", &[]);
    facade::set_level(LogLevel::Error);
    facade::sync().expect("sync before init");
    assert!(!facade::registry::global().is_initialized());

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = facade::new_logger([
        with_log_file_dir(temp_dir.path().to_string_lossy()),
        with_app_name("global"),
        with_level(LogLevel::Info),
        with_error_file_name("error.log"),
    ]);
    assert!(first.is_some());

    let other_dir = TempDir::new().expect("Failed to create temp dir");
    let second = facade::new_logger([with_log_file_dir(other_dir.path().to_string_lossy())]);
    assert!(second.is_none());

    let (line, _) = (line!(), facade::info!({ "via" => "macro" }, "from macro {}", 1));
    facade::debug("filtered", &[]);
    facade::info("accepted", &[Field::new("k", "v")]);
    facade::error("failure", &[]);
    facade::set_level(LogLevel::Error);
    facade::info("filtered after set_level", &[]);
    facade::sync().expect("Failed to sync");

    let base = fs::read_to_string(temp_dir.path().join("global.log")).unwrap();
    assert!(base.contains("[new_logger] success"));
    assert!(base.contains("[new_logger] logger already initialized"));
    assert!(base.contains("accepted"));
    // The notice is logged at Info, after the level was raised to Error
    assert!(!base.contains("[set_level] success"));
    assert!(!base.contains("\"msg\":\"filtered"));

    let macro_record: serde_json::Value = base
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .find(|v| v["msg"] == "from macro 1")
        .expect("macro record written");
    assert_eq!(macro_record["via"], "macro");
    assert_eq!(macro_record["caller"], format!("{}:{}", file!(), line).as_str());

    let errors = fs::read_to_string(temp_dir.path().join("global-error.log")).unwrap();
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("failure"));

    assert_eq!(fs::read_dir(other_dir.path()).unwrap().count(), 0);

    assert_eq!(catch_exception(|| 5), Some(5));
}
