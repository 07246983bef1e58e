//! The composed logging core
//!
//! A `Logger` fans every record that passes its minimum severity out to all
//! attached sinks. Each sink encodes the record on its own.

use super::{
    config::{LoggerConfig, LoggerOption, Mode},
    encoder::{Encoder, EncoderConfig},
    error::Result,
    field::Field,
    log_entry::LogEntry,
    log_level::{LogLevel, SharedLevel},
    sink::Sink,
};
use crate::sinks::{ConsoleSink, LevelRoutedSink, RotatingFileSink, RotationPolicy};
use parking_lot::Mutex;
use std::panic::Location;
use std::sync::Arc;

pub struct Logger {
    config: LoggerConfig,
    min_level: SharedLevel,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
}

impl Logger {
    /// Build a core from a configuration.
    ///
    /// Resolves the output directory, opens the base file sink, one extra
    /// file sink per routed severity, and the console sink in development
    /// mode.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be resolved or a file cannot be opened.
    pub fn build(config: LoggerConfig) -> Result<Self> {
        let config = config.resolve()?;
        let encoder = Encoder::Json(EncoderConfig::for_mode(config.mode));
        let policy = RotationPolicy::from_limits(&config.rotation);

        let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(RotatingFileSink::new(
            config.file_name(&config.file_name),
            policy.clone(),
            encoder.clone(),
        )?)];

        for (level, name) in config.routed_file_names() {
            let file = RotatingFileSink::new(config.file_name(name), policy.clone(), encoder.clone())?;
            sinks.push(Box::new(LevelRoutedSink::new(level, file)));
        }

        if config.is_development() {
            sinks.push(Box::new(ConsoleSink::new()));
        }

        Ok(Self::with_sinks(config, sinks))
    }

    /// Console-only core at Debug, active before explicit initialization
    #[must_use]
    pub fn bootstrap() -> Self {
        let config = LoggerConfig {
            mode: Mode::Development,
            ..LoggerConfig::default()
        };
        Self::with_sinks(config, vec![Box::new(ConsoleSink::new())])
    }

    /// Assemble a core from an already-built set of sinks
    #[must_use]
    pub fn with_sinks(config: LoggerConfig, sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            min_level: SharedLevel::new(config.level),
            config,
            sinks: Mutex::new(sinks),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[must_use]
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.lock().iter().map(|s| s.name().to_string()).collect()
    }

    /// Snapshot of the configuration, with the current minimum severity
    #[must_use]
    pub fn config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.min_level.get(),
            ..self.config.clone()
        }
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.min_level.get()
    }

    /// Hot-swap the minimum severity for records logged from now on
    pub fn set_level(&self, level: LogLevel) {
        self.min_level.set(level);
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.min_level.enabled(level)
    }

    /// Record at `level`, tagged with the caller's source location
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry::new(level, message)
            .with_caller(Location::caller())
            .with_fields(fields);
        let mut sinks = self.sinks.lock();
        Self::dispatch(&mut sinks, &entry);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Flush every sink, returning the first failure after trying them all
    pub fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks.lock().iter_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Hand one record to every sink.
    ///
    /// Each sink is isolated: an error or panic in one is reported on stderr
    /// and the remaining sinks still receive the record.
    fn dispatch(sinks: &mut [Box<dyn Sink>], entry: &LogEntry) {
        for sink in sinks.iter_mut() {
            if !sink.accepts(entry.level) {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.append(entry)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        sink.name(),
                        panic_msg
                    );
                }
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for sink in self.sinks.get_mut().iter_mut() {
            let _ = sink.flush();
        }
    }
}

/// Collects configuration options in call order
///
/// # Example
/// ```no_run
/// use rust_logger_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .app_name("billing")
///     .log_file_dir("/var/log/billing")
///     .level(LogLevel::Info)
///     .error_file_name("error.log")
///     .build()
///     .expect("log directory is writable");
///
/// logger.info("started", &[Field::new("pid", std::process::id())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn options<I: IntoIterator<Item = LoggerOption>>(mut self, options: I) -> Self {
        self.options.extend(options);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_size(self, mb: u64) -> Self {
        self.option(LoggerOption::MaxSize(mb))
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_backups(self, count: usize) -> Self {
        self.option(LoggerOption::MaxBackups(count))
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_age(self, days: u64) -> Self {
        self.option(LoggerOption::MaxAge(days))
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file_dir(self, dir: impl Into<String>) -> Self {
        self.option(LoggerOption::LogFileDir(dir.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::AppName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(self, level: LogLevel) -> Self {
        self.option(LoggerOption::Level(level))
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::FileName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_file_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::ErrorFileName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn warn_file_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::WarnFileName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn info_file_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::InfoFileName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug_file_name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::DebugFileName(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(self, development: bool) -> Self {
        self.option(LoggerOption::Development(development))
    }

    #[must_use = "builder methods return a new value"]
    pub fn merge(self, merge: bool) -> Self {
        self.option(LoggerOption::Merge(merge))
    }

    /// The configuration these options produce, before directory resolution
    #[must_use]
    pub fn config(&self) -> LoggerConfig {
        LoggerConfig::from_options(self.options.iter().cloned())
    }

    /// Build a standalone core that is not installed globally
    pub fn build(self) -> Result<Logger> {
        Logger::build(LoggerConfig::from_options(self.options))
    }

    /// Install through the process-wide registry; `None` if already initialized
    pub fn init(self) -> Result<Option<Arc<Logger>>> {
        crate::registry::try_new_logger(self.options)
    }
}
