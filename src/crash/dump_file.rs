//! Dump file naming
//!
//! Dumps live under `<base>/exceptions/<YYYY-MM-DD>/` and are named
//! `exceptions.<HH>_<MM>_<SS>.log`. When that name is already taken the
//! namer probes `_1`, `_2`, ... until it can create a new file.

use chrono::{DateTime, TimeZone};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub const DUMP_DIR_NAME: &str = "exceptions";
const DUMP_EXTENSION: &str = "log";

/// Directory holding the running binary.
///
/// Falls back to the directory of `argv[0]` and then to the working
/// directory when the executable path is unavailable.
#[must_use]
pub fn binary_dir() -> PathBuf {
    let from_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let from_arg = || {
        env::args_os()
            .next()
            .map(PathBuf::from)
            .and_then(|arg0| arg0.parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
            .and_then(|dir| dir.canonicalize().ok())
    };

    from_exe
        .or_else(from_arg)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct DumpFileNamer {
    base_dir: PathBuf,
}

impl DumpFileNamer {
    /// Namer rooted at the running binary's directory
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_dir(binary_dir())
    }

    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `<base>/exceptions/<YYYY-MM-DD>`
    #[must_use]
    pub fn dump_dir<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        self.base_dir
            .join(DUMP_DIR_NAME)
            .join(now.format("%Y-%m-%d").to_string())
    }

    /// `exceptions.<HH>_<MM>_<SS>`
    #[must_use]
    pub fn base_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}.{}", DUMP_DIR_NAME, now.format("%H_%M_%S"))
    }

    /// Create a fresh dump file for `now`, creating the day directory.
    ///
    /// Candidates are created exclusively, so two concurrent callers never
    /// receive the same file. Directory creation is best effort; a failure
    /// surfaces as the open error.
    ///
    /// # Errors
    ///
    /// Returns the first open error other than the name being taken
    pub fn create<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> io::Result<(PathBuf, File)>
    where
        Tz::Offset: std::fmt::Display,
    {
        let dir = self.dump_dir(now);
        let _ = fs::create_dir_all(&dir);
        let base_name = Self::base_name(now);

        let mut n = 0u64;
        loop {
            let candidate = Self::candidate(&dir, &base_name, n);
            match OpenOptions::new()
                .read(true)
                .append(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        }
    }

    /// `<base>.log` first, then `<base>_<n>.log`
    fn candidate(dir: &Path, base_name: &str, n: u64) -> PathBuf {
        if n == 0 {
            dir.join(format!("{}.{}", base_name, DUMP_EXTENSION))
        } else {
            dir.join(format!("{}_{}.{}", base_name, n, DUMP_EXTENSION))
        }
    }
}

impl Default for DumpFileNamer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::sync::Barrier;
    use std::thread;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 7, h, m, s)
            .unwrap()
    }

    #[test]
    fn test_layout() {
        let namer = DumpFileNamer::with_base_dir("/opt/app/bin");
        assert_eq!(
            namer.dump_dir(&at(10, 30, 0)),
            Path::new("/opt/app/bin").join("exceptions").join("2025-03-07")
        );
        assert_eq!(DumpFileNamer::base_name(&at(9, 5, 3)), "exceptions.09_05_03");
    }

    #[test]
    fn test_first_dump_of_the_second() {
        let dir = tempdir().unwrap();
        let namer = DumpFileNamer::with_base_dir(dir.path());
        let (path, _file) = namer.create(&at(10, 30, 0)).unwrap();

        assert_eq!(path.file_name().unwrap(), "exceptions.10_30_00.log");
        assert!(path.is_file());
    }

    #[test]
    fn test_collisions_get_increasing_suffixes() {
        let dir = tempdir().unwrap();
        let namer = DumpFileNamer::with_base_dir(dir.path());
        let now = at(10, 30, 0);

        let expected = [
            "exceptions.10_30_00.log",
            "exceptions.10_30_00_1.log",
            "exceptions.10_30_00_2.log",
            "exceptions.10_30_00_3.log",
        ];
        for name in expected {
            let (path, _file) = namer.create(&now).unwrap();
            assert_eq!(path.file_name().unwrap(), name);
        }
    }

    #[test]
    fn test_existing_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let namer = DumpFileNamer::with_base_dir(dir.path());
        let now = at(23, 59, 59);
        let day = namer.dump_dir(&now);
        fs::create_dir_all(day.join("exceptions.23_59_59.log")).unwrap();
        fs::write(day.join("exceptions.23_59_59_1.log"), "earlier dump").unwrap();

        let (path, _file) = namer.create(&now).unwrap();
        assert_eq!(path.file_name().unwrap(), "exceptions.23_59_59_2.log");
        assert_eq!(
            fs::read_to_string(day.join("exceptions.23_59_59_1.log")).unwrap(),
            "earlier dump"
        );
    }

    #[test]
    fn test_concurrent_callers_get_distinct_files() {
        let dir = tempdir().unwrap();
        let namer = DumpFileNamer::with_base_dir(dir.path());
        let now = at(12, 0, 0);
        let barrier = Barrier::new(16);

        let mut paths: Vec<PathBuf> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        namer.create(&now).unwrap().0
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 16);
    }

    #[test]
    fn test_unusable_base_reports_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("exceptions"), "not a directory").unwrap();
        let namer = DumpFileNamer::with_base_dir(dir.path());

        assert!(namer.create(&at(8, 0, 0)).is_err());
    }

    #[test]
    fn test_binary_dir_is_absolute() {
        assert!(binary_dir().is_absolute());
    }
}
