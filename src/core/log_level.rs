//! Severity definitions

use super::error::LoggerError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum LogLevel {
    #[default]
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// All severities in ascending order
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Lowercase name used by the production encoder preset
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Magenta,
            LogLevel::Info => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(LoggerError::config(
                "LogLevel",
                format!("unknown level '{}'", s),
            )),
        }
    }
}

/// Minimum severity shared between a core and whoever may hot-swap it.
///
/// Reads happen on every log call, writes only through `set`. A change is
/// observed by every call that starts after `set` returns.
#[derive(Debug, Clone)]
pub struct SharedLevel {
    inner: Arc<RwLock<LogLevel>>,
}

impl SharedLevel {
    pub fn new(level: LogLevel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(level)),
        }
    }

    pub fn get(&self) -> LogLevel {
        *self.inner.read()
    }

    pub fn set(&self, level: LogLevel) {
        *self.inner.write() = level;
    }

    /// `true` when a record at `level` passes the threshold
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.inner.read()
    }
}

impl Default for SharedLevel {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}
