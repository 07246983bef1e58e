//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod sink;
pub mod time_format;

pub use config::{LoggerConfig, LoggerOption, Mode, RotationLimits};
pub use encoder::{Encoder, EncoderConfig, LevelEncoding};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::LogEntry;
pub use log_level::{LogLevel, SharedLevel};
pub use logger::{Logger, LoggerBuilder};
pub use sink::Sink;
pub use time_format::{format_time, TIME_LAYOUT};
