//! Record encoders
//!
//! Two encodings are provided:
//! - Console: tab-separated, human-readable, optionally colour-coded levels
//! - Json: one self-describing object per line
//!
//! Records that carry a source location get it under the preset's caller
//! key, between the level and the message.
//!
//! Both render time through [`format_time`](super::time_format::format_time).

use super::config::Mode;
use super::field::fields_to_json;
use super::log_entry::LogEntry;
use super::time_format::format_time;
use colored::Colorize;

/// How the severity is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    /// `info`
    Lowercase,
    /// `INFO`
    Capital,
    /// `INFO` wrapped in the level's terminal colour
    CapitalColor,
}

/// Key names and level style shared by both encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: &'static str,
    pub level_key: &'static str,
    pub caller_key: &'static str,
    pub message_key: &'static str,
    pub level_encoding: LevelEncoding,
}

impl EncoderConfig {
    /// Compact structured preset
    #[must_use]
    pub fn production() -> Self {
        Self {
            time_key: "ts",
            level_key: "level",
            caller_key: "caller",
            message_key: "msg",
            level_encoding: LevelEncoding::Lowercase,
        }
    }

    /// Human-oriented preset
    #[must_use]
    pub fn development() -> Self {
        Self {
            time_key: "T",
            level_key: "L",
            caller_key: "C",
            message_key: "M",
            level_encoding: LevelEncoding::Capital,
        }
    }

    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Development => Self::development(),
            Mode::Production => Self::production(),
        }
    }

    #[must_use]
    pub fn with_level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    fn encode_level(&self, entry: &LogEntry) -> String {
        match self.level_encoding {
            LevelEncoding::Lowercase => entry.level.as_lowercase().to_string(),
            LevelEncoding::Capital => entry.level.to_str().to_string(),
            LevelEncoding::CapitalColor => entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    Console(EncoderConfig),
    Json(EncoderConfig),
}

impl Encoder {
    /// Console encoder with coloured capital levels, used for terminal output
    #[must_use]
    pub fn colored_console() -> Self {
        Encoder::Console(
            EncoderConfig::development().with_level_encoding(LevelEncoding::CapitalColor),
        )
    }

    /// Encode a record as a single line, without the trailing newline
    pub fn encode(&self, entry: &LogEntry) -> String {
        match self {
            Encoder::Console(config) => Self::encode_console(config, entry),
            Encoder::Json(config) => Self::encode_json(config, entry),
        }
    }

    fn encode_console(config: &EncoderConfig, entry: &LogEntry) -> String {
        let mut line = format!(
            "{}\t{}",
            format_time(&entry.timestamp),
            config.encode_level(entry)
        );
        if let Some(caller) = entry.caller_text() {
            line.push('\t');
            line.push_str(&caller);
        }
        line.push('\t');
        line.push_str(&entry.message);

        if !entry.fields.is_empty() {
            let fields = serde_json::Value::Object(fields_to_json(&entry.fields));
            line.push('\t');
            line.push_str(&fields.to_string());
        }

        line
    }

    fn encode_json(config: &EncoderConfig, entry: &LogEntry) -> String {
        let mut obj = serde_json::Map::new();
        obj.insert(
            config.level_key.to_string(),
            serde_json::Value::String(config.encode_level(entry)),
        );
        obj.insert(
            config.time_key.to_string(),
            serde_json::Value::String(format_time(&entry.timestamp)),
        );
        if let Some(caller) = entry.caller_text() {
            obj.insert(
                config.caller_key.to_string(),
                serde_json::Value::String(caller),
            );
        }
        obj.insert(
            config.message_key.to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        // Fields never overwrite the record's own keys
        for (key, value) in fields_to_json(&entry.fields) {
            obj.entry(key).or_insert(value);
        }

        serde_json::Value::Object(obj).to_string()
    }
}
