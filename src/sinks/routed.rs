//! Severity-routed sink wrapper

use crate::core::{LogEntry, LogLevel, Result, Sink};

/// Forwards only records of exactly one severity to the wrapped sink.
///
/// Used for per-severity log files; the core's minimum-severity filter still
/// applies before this one.
pub struct LevelRoutedSink<S> {
    level: LogLevel,
    inner: S,
    name: String,
}

impl<S: Sink> LevelRoutedSink<S> {
    pub fn new(level: LogLevel, inner: S) -> Self {
        let name = format!("{}[{}]", inner.name(), level.as_lowercase());
        Self { level, inner, name }
    }
}

impl<S: Sink> Sink for LevelRoutedSink<S> {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        if entry.level != self.level {
            return Ok(());
        }
        self.inner.append(entry)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, level: LogLevel) -> bool {
        level == self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording(Arc<Mutex<Vec<LogLevel>>>);

    impl Sink for Recording {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.0.lock().unwrap().push(entry.level);
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_only_matching_level_passes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut sink = LevelRoutedSink::new(LogLevel::Warn, Recording(Arc::clone(&seen)));

        for level in LogLevel::ALL {
            sink.append(&LogEntry::new(level, "m")).unwrap();
        }

        assert_eq!(*seen.lock().unwrap(), vec![LogLevel::Warn]);
        assert!(sink.accepts(LogLevel::Warn));
        assert!(!sink.accepts(LogLevel::Error));
        assert_eq!(sink.name(), "recording[warn]");
    }
}
