//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

pub trait Sink: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Extra per-sink selection applied after the core's severity filter
    fn accepts(&self, _level: LogLevel) -> bool {
        true
    }
}
