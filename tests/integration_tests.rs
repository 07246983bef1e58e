//! Integration tests for the logger facade
//!
//! These tests verify:
//! - File layout produced by a configured core
//! - Per-severity routing and merge
//! - Rotation with retention through the public builder
//! - Crash capture end to end

use rust_logger_facade::crash::CrashRecorder;
use rust_logger_facade::prelude::*;
use rust_logger_facade::sinks::RotatingFileSink;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_lines(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
        .collect()
}

fn dir_string(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[test]
fn test_production_file_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .app_name("billing")
        .build()
        .expect("Failed to build logger");

    logger.info("invoice issued", &[Field::new("invoice", "INV-7"), Field::new("cents", 1999)]);
    logger.sync().expect("Failed to sync");

    let lines = read_lines(&temp_dir.path().join("billing.log"));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "info");
    assert_eq!(lines[0]["msg"], "invoice issued");
    assert_eq!(lines[0]["invoice"], "INV-7");
    assert_eq!(lines[0]["cents"], 1999);
}

#[test]
fn test_records_carry_call_site() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .build()
        .expect("Failed to build logger");

    let (line, _) = (line!(), logger.warn("located", &[]));
    logger.sync().expect("Failed to sync");

    let lines = read_lines(&temp_dir.path().join("app.log"));
    let caller = lines[0]["caller"].as_str().expect("caller key present");
    assert_eq!(caller, format!("{}:{}", file!(), line));
}

#[test]
fn test_log_injection_is_neutralized() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .build()
        .expect("Failed to build logger");

    logger.warn("User login\n{\"level\":\"error\",\"msg\":\"forged\"}", &[]);
    logger.sync().expect("Failed to sync");

    let lines = read_lines(&temp_dir.path().join("app.log"));
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
    assert_eq!(lines[0]["level"], "warn");
}

#[test]
fn test_error_routing_with_base_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .app_name("svc")
        .error_file_name("error.log")
        .build()
        .expect("Failed to build logger");

    logger.info("fine", &[]);
    logger.error("broken", &[]);
    logger.sync().expect("Failed to sync");

    let base = read_lines(&temp_dir.path().join("svc.log"));
    assert_eq!(base.len(), 2);

    let errors = read_lines(&temp_dir.path().join("svc-error.log"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["msg"], "broken");
}

#[test]
fn test_four_byte_suffix_has_no_hyphen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .app_name("svc")
        .warn_file_name("warn")
        .build()
        .expect("Failed to build logger");

    logger.warn("careful", &[]);
    logger.sync().expect("Failed to sync");

    assert!(temp_dir.path().join("svcwarn").exists());
    assert!(!temp_dir.path().join("svc-warn").exists());
}

#[test]
fn test_merge_keeps_single_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .app_name("svc")
        .error_file_name("error.log")
        .info_file_name("info.log")
        .merge(true)
        .build()
        .expect("Failed to build logger");

    logger.error("broken", &[]);
    logger.sync().expect("Failed to sync");

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["svc.log"]);
}

#[test]
fn test_set_level_hot_swap() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .level(LogLevel::Info)
        .build()
        .expect("Failed to build logger");

    logger.debug("dropped", &[]);
    logger.info("kept 1", &[]);
    logger.set_level(LogLevel::Error);
    logger.warn("dropped", &[]);
    logger.error("kept 2", &[]);
    logger.set_level(LogLevel::Debug);
    logger.debug("kept 3", &[]);
    logger.sync().expect("Failed to sync");

    let messages: Vec<String> = read_lines(&temp_dir.path().join("app.log"))
        .iter()
        .map(|v| v["msg"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages, ["kept 1", "kept 2", "kept 3"]);
}

#[test]
fn test_development_mode_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .log_file_dir(dir_string(&temp_dir))
        .development(true)
        .build()
        .expect("Failed to build logger");

    logger.info("hello", &[]);
    logger.sync().expect("Failed to sync");

    let lines = read_lines(&temp_dir.path().join("app.log"));
    assert_eq!(lines[0]["L"], "INFO");
    assert_eq!(lines[0]["M"], "hello");
    assert!(lines[0]["T"].is_string());
}

#[test]
fn test_rotation_retention_through_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("rotating.log");
    let policy = RotationPolicy::default()
        .with_max_bytes(256)
        .with_max_backups(2)
        .with_compression(false);

    let mut sink = RotatingFileSink::new(&path, policy, Encoder::Json(EncoderConfig::production()))
        .expect("Failed to create sink");
    for i in 0..60 {
        let entry = LogEntry::new(LogLevel::Info, format!("message number {}", i));
        sink.append(&entry).expect("Failed to append");
    }
    sink.flush().expect("Failed to flush");

    let backups = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "rotating.log")
        .count();
    assert_eq!(backups, 2);
    assert!(fs::metadata(&path).unwrap().len() <= 256);
}

#[test]
fn test_crash_dump_written_and_execution_continues() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let recorder = CrashRecorder::with_base_dir(temp_dir.path());

    let result: Option<u32> = recorder.guard(|| {
        let values: Vec<u32> = vec![1, 2, 3];
        let index = values.len() + 2;
        values[index]
    });
    assert!(result.is_none());

    let day_dirs: Vec<_> = fs::read_dir(temp_dir.path().join("exceptions"))
        .expect("exceptions directory exists")
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(day_dirs.len(), 1);

    let dumps: Vec<_> = fs::read_dir(&day_dirs[0]).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(dumps.len(), 1);
    let text = fs::read_to_string(&dumps[0]).unwrap();
    assert!(text.contains("EXCEPTION: \"index out of bounds"));
    assert!(text.contains("TIME: "));
}
