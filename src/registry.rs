//! Process-wide logger registry
//!
//! The registry owns the dispatch slot every global entry point reads. The
//! slot starts on the bootstrap core and is swapped to the configured core by
//! the first successful initialization. Initialization is serialized by one
//! lock; once a core is installed, further attempts log a notice and return
//! without building anything.

use crate::core::{Field, LogLevel, Logger, LoggerConfig, LoggerOption, Result};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, OnceLock};

pub struct LoggerRegistry {
    /// The configured core, set at most once
    core: Mutex<Option<Arc<Logger>>>,
    /// What the entry points dispatch to
    active: RwLock<Arc<Logger>>,
}

impl LoggerRegistry {
    /// A registry dispatching to a fresh bootstrap core
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Mutex::new(None),
            active: RwLock::new(Arc::new(Logger::bootstrap())),
        }
    }

    /// Build and install a core from `options` applied over the defaults.
    ///
    /// Returns `Ok(None)` without side effects beyond one informational
    /// record when a core is already installed.
    ///
    /// # Errors
    ///
    /// Fails when the core cannot be built; nothing is installed then.
    pub fn init<I>(&self, options: I) -> Result<Option<Arc<Logger>>>
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        self.init_with_config(LoggerConfig::from_options(options))
    }

    pub fn init_with_config(&self, config: LoggerConfig) -> Result<Option<Arc<Logger>>> {
        let mut core = self.core.lock();
        if let Some(existing) = core.as_ref() {
            existing.info("[new_logger] logger already initialized", &[]);
            return Ok(None);
        }

        let logger = match Logger::build(config) {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                self.active().error("[new_logger] failed", &[Field::error(&e)]);
                return Err(e);
            }
        };
        *self.active.write() = Arc::clone(&logger);
        *core = Some(Arc::clone(&logger));
        drop(core);

        logger.info("[new_logger] success", &[]);
        Ok(Some(logger))
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.core.lock().is_some()
    }

    /// The configured core, if initialization has happened
    #[must_use]
    pub fn core(&self) -> Option<Arc<Logger>> {
        self.core.lock().clone()
    }

    /// The core entry points currently dispatch to
    #[must_use]
    pub fn active(&self) -> Arc<Logger> {
        Arc::clone(&self.active.read())
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: &[Field]) {
        self.active().log(level, message, fields);
    }

    /// Hot-swap the minimum severity; no-op before initialization
    pub fn set_level(&self, level: LogLevel) {
        if let Some(core) = self.core() {
            core.set_level(level);
            core.info("[set_level] success", &[Field::new("level", level.to_str())]);
        }
    }

    /// Flush the configured core; no-op before initialization
    pub fn sync(&self) -> Result<()> {
        match self.core() {
            Some(core) => core.sync(),
            None => Ok(()),
        }
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();

/// The process-wide registry
pub fn global() -> &'static LoggerRegistry {
    GLOBAL.get_or_init(LoggerRegistry::new)
}

/// Initialize the process-wide core.
///
/// Startup configuration is fail-fast: if the core cannot be built the error
/// is printed to stderr and the process exits with status 1. Returns `None`
/// when a core was already installed.
pub fn new_logger<I>(options: I) -> Option<Arc<Logger>>
where
    I: IntoIterator<Item = LoggerOption>,
{
    match try_new_logger(options) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("[LOGGER FATAL] cannot build logger: {}", e);
            std::process::exit(1);
        }
    }
}

/// [`new_logger`] without the process exit
pub fn try_new_logger<I>(options: I) -> Result<Option<Arc<Logger>>>
where
    I: IntoIterator<Item = LoggerOption>,
{
    global().init(options)
}

#[track_caller]
pub fn log(level: LogLevel, message: impl AsRef<str>, fields: &[Field]) {
    global().log(level, message, fields);
}

#[track_caller]
pub fn debug(message: impl AsRef<str>, fields: &[Field]) {
    log(LogLevel::Debug, message, fields);
}

#[track_caller]
pub fn info(message: impl AsRef<str>, fields: &[Field]) {
    log(LogLevel::Info, message, fields);
}

#[track_caller]
pub fn warn(message: impl AsRef<str>, fields: &[Field]) {
    log(LogLevel::Warn, message, fields);
}

#[track_caller]
pub fn error(message: impl AsRef<str>, fields: &[Field]) {
    log(LogLevel::Error, message, fields);
}

pub fn set_level(level: LogLevel) {
    global().set_level(level);
}

pub fn sync() -> Result<()> {
    global().sync()
}
