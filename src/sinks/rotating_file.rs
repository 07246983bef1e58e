//! Rotating file sink
//!
//! Rotates on size. A retired file is renamed to
//! `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm><ext>` in local time, then backups are
//! milled: anything past the backup count or older than the age limit is
//! removed and the rest are gzip-compressed when compression is enabled.

use crate::core::config::RotationLimits;
use crate::core::encoder::Encoder;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use crate::core::sink::Sink;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// Limits in the units the writer works with
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    /// 0 keeps every backup
    pub max_backups: usize,
    pub max_age: Option<Duration>,
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_limits(&RotationLimits::default())
    }
}

impl RotationPolicy {
    /// Convert configured limits; compression is always on for configured sinks
    #[must_use]
    pub fn from_limits(limits: &RotationLimits) -> Self {
        let max_size_mb = if limits.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            limits.max_size_mb
        };
        let max_age = (limits.max_age_days > 0)
            .then(|| Duration::from_secs(limits.max_age_days * 24 * 3600));

        Self {
            max_bytes: max_size_mb.saturating_mul(MEGABYTE),
            max_backups: limits.max_backups,
            max_age,
            compress: true,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

#[derive(Debug)]
struct Backup {
    path: PathBuf,
    stamp: NaiveDateTime,
    compressed: bool,
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    encoder: Encoder,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open (or create) the file at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy, encoder: Encoder) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            encoder,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file.metadata().map(|m| m.len()).map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;
        Ok((file, size))
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// `app.log` splits into (`app`, `.log`); a name without extension has an empty one
    fn stem_and_ext(&self) -> (String, String) {
        let file_name = self
            .base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match file_name.rfind('.') {
            Some(idx) => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            None => (file_name, String::new()),
        }
    }

    fn backup_path(&self, stamp: &DateTime<Local>) -> PathBuf {
        let (stem, ext) = self.stem_and_ext();
        self.base_path.with_file_name(format!(
            "{}-{}{}",
            stem,
            stamp.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    /// Close the current file, move it aside and start a fresh one
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            // Two rotations inside one millisecond would otherwise collide
            let mut stamp = Local::now();
            let mut backup = self.backup_path(&stamp);
            while backup.exists() || append_suffix(&backup, COMPRESS_SUFFIX).exists() {
                stamp = stamp + chrono::Duration::milliseconds(1);
                backup = self.backup_path(&stamp);
            }

            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        let (file, size) = Self::open(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;

        self.mill()
    }

    /// Backups of this file, newest first
    fn backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.base_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.stem_and_ext();
        let prefix = format!("{}-", stem);

        let mut backups = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let (name, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
                Some(inner) => (inner.to_string(), true),
                None => (name, false),
            };
            let stamp = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(ext.as_str()))
                .and_then(|ts| NaiveDateTime::parse_from_str(ts, BACKUP_TIME_FORMAT).ok());
            if let Some(stamp) = stamp {
                backups.push(Backup {
                    path: entry.path(),
                    stamp,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.stamp.cmp(&a.stamp));
        Ok(backups)
    }

    /// Remove backups past the count or age limit, compress the survivors
    fn mill(&self) -> Result<()> {
        let mut backups = self.backups()?;

        let mut expired = Vec::new();
        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            expired = backups.split_off(self.policy.max_backups);
        }
        let cutoff = self
            .policy
            .max_age
            .and_then(|age| chrono::Duration::from_std(age).ok())
            .and_then(|age| Local::now().naive_local().checked_sub_signed(age));
        if let Some(cutoff) = cutoff {
            let (keep, old): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|b| b.stamp >= cutoff);
            backups = keep;
            expired.extend(old);
        }

        for backup in &expired {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[WARN] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                compress_file(&backup.path)?;
            }
        }

        Ok(())
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Gzip `path` into `path.gz`, removing the original only after success
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let gz_path = append_suffix(path, COMPRESS_SUFFIX);
    let temp_path = append_suffix(&gz_path, ".tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let output = File::create(&temp_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_path.display()),
            e,
        )
    })?;

    let mut reader = BufReader::with_capacity(64 * 1024, input);
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let finished = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut out| out.flush());
    if let Err(e) = finished {
        let _ = fs::remove_file(&temp_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

impl Sink for RotatingFileSink {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = self.encoder.encode(entry);
        line.push('\n');
        let len = line.len() as u64;

        if self.current_size > 0 && self.current_size + len > self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                if self.writer.is_none() {
                    let (file, size) = Self::open(&self.base_path)?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
