//! Initialize the process-wide logger, log a few records, and survive a
//! panic in a guarded block.
//!
//! Run with `cargo run --example crash_recovery`.

use rust_logger_facade::{
    self as facade, catch_exception, spawn_guarded, with_app_name, with_development,
    with_error_file_name, with_level, Field, LogLevel,
};

fn parse_port(raw: &str) -> u16 {
    raw.parse().unwrap_or_else(|e| panic!("bad port {:?}: {}", raw, e))
}

fn main() {
    facade::info("logging before init goes to the console", &[]);

    facade::new_logger([
        with_app_name("crash-demo"),
        with_level(LogLevel::Debug),
        with_error_file_name("error.log"),
        with_development(true),
    ]);

    facade::debug("configuration loaded", &[Field::new("pid", std::process::id())]);

    let port = catch_exception(|| parse_port("80eighty"));
    facade::warn("falling back to default port", &[Field::new("parsed", port.is_some())]);

    let worker = spawn_guarded(|| {
        let queue: Vec<&str> = Vec::new();
        queue[0].len()
    });
    let outcome = worker.join().ok().flatten();
    facade::info("worker finished", &[Field::new("result", outcome)]);

    facade::set_level(LogLevel::Warn);
    facade::info("suppressed", &[]);
    facade::error("still visible", &[]);

    if let Err(e) = facade::sync() {
        eprintln!("flush failed: {}", e);
    }
}
