//! Formatting macros over the process-wide entry points.
//!
//! Each macro formats its arguments like `format!` and hands the result to
//! the matching global function. Structured fields go in a leading brace
//! block.
//!
//! # Examples
//!
//! ```no_run
//! use rust_logger_facade::{info, warn};
//!
//! // Basic logging
//! info!("Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!("Server listening on port {}", port);
//!
//! // With fields
//! let attempt = 3;
//! warn!({ "attempt" => attempt, "host" => "db-1" }, "Retrying connection");
//! ```

/// Log at an explicit level.
///
/// ```no_run
/// use rust_logger_facade::{log, LogLevel};
/// log!(LogLevel::Info, "Simple message");
/// log!(LogLevel::Error, { "code" => 500 }, "Request failed: {}", "timeout");
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, { $($key:literal => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $crate::registry::log(
            $level,
            format!($($arg)+),
            &[$($crate::core::Field::new($key, $value)),*],
        )
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::registry::log($level, format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
///
/// ```no_run
/// use rust_logger_facade::debug;
/// debug!("Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```no_run
/// use rust_logger_facade::error;
/// error!({ "path" => "/tmp/x" }, "Failed to open file");
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}
