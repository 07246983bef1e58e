//! Console sink implementation

use crate::core::{Encoder, LogEntry, Result, Sink};
use std::io::Write;

/// Writes encoded records to stdout
pub struct ConsoleSink {
    encoder: Encoder,
}

impl ConsoleSink {
    /// Human-readable console encoding with coloured levels
    pub fn new() -> Self {
        Self {
            encoder: Encoder::colored_console(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.encoder.encode(entry);
        // Holding the lock keeps concurrent records from interleaving
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
