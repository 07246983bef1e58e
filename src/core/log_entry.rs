//! Log record structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::panic::Location;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Source location of the logging call, when it was tracked
    pub caller: Option<&'static Location<'static>>,
    pub fields: Vec<Field>,
}

impl LogEntry {
    /// Escape newlines, carriage returns and tabs so one record stays one line
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Local::now(),
            caller: None,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: &[Field]) -> Self {
        self.fields.extend_from_slice(fields);
        self
    }

    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }

    /// `file:line` of the logging call
    #[must_use]
    pub fn caller_text(&self) -> Option<String> {
        self.caller.map(|c| format!("{}:{}", c.file(), c.line()))
    }
}
