//! Logger configuration and the ordered option mutations applied over defaults

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{is_separator, Path, MAIN_SEPARATOR};

/// Base file suffix used when no file name option is given
pub const DEFAULT_FILE_NAME: &str = ".log";
/// File name prefix used when no app name option is given
pub const DEFAULT_APP_NAME: &str = "app";
/// Directory (under the working directory) used when no output directory is given
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Selects the encoder preset and whether the console sink is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

/// Limits handed to the rotating file writer.
///
/// Zero follows the writer's conventions: `max_size_mb == 0` means 100 MB,
/// `max_backups == 0` keeps every backup, `max_age_days == 0` disables
/// age-based removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationLimits {
    pub max_size_mb: u64,
    pub max_backups: usize,
    pub max_age_days: u64,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            max_size_mb: 100,
            max_backups: 60,
            max_age_days: 30,
        }
    }
}

/// Everything `new_logger` needs to build a core.
///
/// Built once from defaults plus options; read-only after initialization
/// except for the minimum severity, which lives in the core's shared level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output directory; empty until resolved, then absolute with a trailing separator
    pub log_file_dir: String,
    pub app_name: String,
    /// Base file suffix, `.log` by default
    pub file_name: String,
    /// Optional per-severity file names
    pub level_file_names: BTreeMap<LogLevel, String>,
    pub level: LogLevel,
    pub rotation: RotationLimits,
    pub mode: Mode,
    /// Send everything to the base file, ignoring per-severity names
    pub merge: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file_dir: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            level_file_names: BTreeMap::new(),
            level: LogLevel::Debug,
            rotation: RotationLimits::default(),
            mode: Mode::Production,
            merge: false,
        }
    }
}

impl LoggerConfig {
    /// Apply options in order over the defaults. Later options win.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.mode == Mode::Development
    }

    /// Resolve the output directory to an absolute path ending in a separator.
    ///
    /// An empty directory becomes `<cwd>/logs/`.
    pub fn resolve(mut self) -> Result<Self> {
        self.log_file_dir = resolve_log_file_dir(&self.log_file_dir)?;
        Ok(self)
    }

    /// Full path of a log file for the given suffix.
    ///
    /// A suffix exactly as long as `.log` is glued straight onto the app
    /// name (`app.log`); any other suffix gets a hyphen (`app-error.log`).
    /// The check is on length, so any four-byte suffix takes the first form.
    #[must_use]
    pub fn file_name(&self, suffix: &str) -> String {
        if suffix.len() == DEFAULT_FILE_NAME.len() {
            format!(
                "{}{}{}{}",
                self.log_file_dir, MAIN_SEPARATOR, self.app_name, suffix
            )
        } else {
            format!(
                "{}{}{}-{}",
                self.log_file_dir, MAIN_SEPARATOR, self.app_name, suffix
            )
        }
    }

    /// Per-severity file names that get their own sink.
    ///
    /// Empty when merging or when no override is set.
    pub fn routed_file_names(&self) -> impl Iterator<Item = (LogLevel, &str)> + '_ {
        self.level_file_names
            .iter()
            .filter(|(_, name)| !self.merge && !name.is_empty())
            .map(|(level, name)| (*level, name.as_str()))
    }
}

fn resolve_log_file_dir(dir: &str) -> Result<String> {
    let cwd = || {
        env::current_dir().map_err(|e| {
            LoggerError::io_operation("resolving log directory", "cannot read working directory", e)
        })
    };

    let mut resolved = if dir.is_empty() {
        cwd()?
            .join(DEFAULT_LOG_DIR_NAME)
            .to_string_lossy()
            .into_owned()
    } else if Path::new(dir).is_absolute() {
        dir.to_string()
    } else {
        cwd()?.join(dir).to_string_lossy().into_owned()
    };

    if !resolved.ends_with(is_separator) {
        resolved.push(MAIN_SEPARATOR);
    }
    Ok(resolved)
}

/// One configuration mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggerOption {
    MaxSize(u64),
    MaxBackups(usize),
    MaxAge(u64),
    LogFileDir(String),
    AppName(String),
    Level(LogLevel),
    FileName(String),
    ErrorFileName(String),
    WarnFileName(String),
    InfoFileName(String),
    DebugFileName(String),
    Development(bool),
    Merge(bool),
}

impl LoggerOption {
    pub fn apply(self, config: &mut LoggerConfig) {
        match self {
            LoggerOption::MaxSize(mb) => config.rotation.max_size_mb = mb,
            LoggerOption::MaxBackups(count) => config.rotation.max_backups = count,
            LoggerOption::MaxAge(days) => config.rotation.max_age_days = days,
            LoggerOption::LogFileDir(dir) => config.log_file_dir = dir,
            LoggerOption::AppName(name) => config.app_name = name,
            LoggerOption::Level(level) => config.level = level,
            LoggerOption::FileName(name) => config.file_name = name,
            LoggerOption::ErrorFileName(name) => {
                config.level_file_names.insert(LogLevel::Error, name);
            }
            LoggerOption::WarnFileName(name) => {
                config.level_file_names.insert(LogLevel::Warn, name);
            }
            LoggerOption::InfoFileName(name) => {
                config.level_file_names.insert(LogLevel::Info, name);
            }
            LoggerOption::DebugFileName(name) => {
                config.level_file_names.insert(LogLevel::Debug, name);
            }
            LoggerOption::Development(true) => config.mode = Mode::Development,
            LoggerOption::Development(false) => config.mode = Mode::Production,
            LoggerOption::Merge(merge) => config.merge = merge,
        }
    }
}

pub fn with_max_size(mb: u64) -> LoggerOption {
    LoggerOption::MaxSize(mb)
}

pub fn with_max_backups(count: usize) -> LoggerOption {
    LoggerOption::MaxBackups(count)
}

pub fn with_max_age(days: u64) -> LoggerOption {
    LoggerOption::MaxAge(days)
}

pub fn with_log_file_dir(dir: impl Into<String>) -> LoggerOption {
    LoggerOption::LogFileDir(dir.into())
}

pub fn with_app_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::AppName(name.into())
}

pub fn with_level(level: LogLevel) -> LoggerOption {
    LoggerOption::Level(level)
}

pub fn with_file_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::FileName(name.into())
}

pub fn with_error_file_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::ErrorFileName(name.into())
}

pub fn with_warn_file_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::WarnFileName(name.into())
}

pub fn with_info_file_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::InfoFileName(name.into())
}

pub fn with_debug_file_name(name: impl Into<String>) -> LoggerOption {
    LoggerOption::DebugFileName(name.into())
}

pub fn with_development(development: bool) -> LoggerOption {
    LoggerOption::Development(development)
}

pub fn with_merge(merge: bool) -> LoggerOption {
    LoggerOption::Merge(merge)
}
