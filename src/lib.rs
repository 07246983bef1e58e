//! # Rust Logger Facade
//!
//! An application-wide logging facade with a single process-wide core.
//!
//! ## Features
//!
//! - **Init once**: the first successful [`new_logger`] wins; later calls are
//!   harmless notices
//! - **Always usable**: before initialization every entry point writes to a
//!   bootstrap console core
//! - **Rotating files**: size based rotation with backup retention and gzip
//! - **Per-severity files**: route one severity to its own file
//! - **Crash capture**: [`catch_exception`] turns a panic into a dump file
//!
//! ## Example
//!
//! ```no_run
//! use rust_logger_facade::{self as log, with_app_name, with_level, Field, LogLevel};
//!
//! log::new_logger([with_app_name("billing"), with_level(LogLevel::Info)]);
//! log::info("service started", &[Field::new("port", 8080)]);
//! log::set_level(LogLevel::Warn);
//! log::sync().ok();
//! ```

pub mod core;
pub mod crash;
pub mod macros;
pub mod registry;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Encoder, EncoderConfig, Field, FieldValue, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerOption, Mode, Result, RotationLimits, Sink,
    };
    pub use crate::crash::{catch_exception, spawn_guarded, CrashRecorder};
    pub use crate::registry::LoggerRegistry;
    pub use crate::sinks::{ConsoleSink, LevelRoutedSink, RotatingFileSink, RotationPolicy};
}

pub use crate::core::config::{
    with_app_name, with_debug_file_name, with_development, with_error_file_name,
    with_file_name, with_info_file_name, with_level, with_log_file_dir, with_max_age,
    with_max_backups, with_max_size, with_merge, with_warn_file_name,
};
pub use crate::core::{
    format_time, Field, FieldValue, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerOption, Mode, Result,
};
pub use crash::{catch_exception, spawn_guarded, CrashRecorder};
pub use registry::{
    debug, error, info, log, new_logger, set_level, sync, try_new_logger, warn, LoggerRegistry,
};
