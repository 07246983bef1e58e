//! Last-resort panic boundary
//!
//! A guarded block runs a closure; if it panics, the payload and the stack
//! trace are written to a fresh dump file, mirrored to stdout, and the caller
//! carries on. The panic is never resumed.

use super::dump_file::DumpFileNamer;
use crate::core::{format_time, Field, LoggerError};
use chrono::{DateTime, Local};
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::thread::{self, JoinHandle};

const RULE: &str =
    "===============================================================================";

/// What the panic hook saw at the panic site
struct PanicCapture {
    location: Option<String>,
    backtrace: String,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicCapture>> = const { RefCell::new(None) };
    /// Number of guards currently running on this thread
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static HOOK: Once = Once::new();

/// Install the hook that records the backtrace where a panic starts.
///
/// Installed once per process; the previously installed hook still runs.
/// Panics outside any guard are passed through without capturing.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if guard_depth() == 0 {
                previous(info);
                return;
            }
            let capture = PanicCapture {
                location: info.location().map(|l| l.to_string()),
                backtrace: Backtrace::force_capture().to_string(),
            };
            let _ = LAST_PANIC.try_with(|slot| *slot.borrow_mut() = Some(capture));
            previous(info);
        }));
    });
}

fn take_capture() -> Option<PanicCapture> {
    LAST_PANIC.try_with(|slot| slot.borrow_mut().take()).ok().flatten()
}

fn guard_depth() -> usize {
    GUARD_DEPTH.try_with(Cell::get).unwrap_or(0)
}

/// Marks the current thread as running guarded code until dropped
struct ActiveGuard;

impl ActiveGuard {
    fn enter() -> Self {
        let _ = GUARD_DEPTH.try_with(|depth| depth.set(depth.get() + 1));
        ActiveGuard
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let _ = GUARD_DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Most detailed text available for a panic payload
#[must_use]
pub fn describe_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("{:?}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("{:?}", s)
    } else if let Some(e) = payload.downcast_ref::<LoggerError>() {
        format!("{:?}", e)
    } else if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        format!("{:?}", e)
    } else {
        "Box<dyn Any + Send>".to_string()
    }
}

/// One crash, rendered to text right before it is written
#[derive(Debug, Clone)]
pub struct DumpRecord {
    pub time: DateTime<Local>,
    pub exception: String,
    pub location: Option<String>,
    pub backtrace: String,
}

impl DumpRecord {
    #[must_use]
    pub fn render(&self) -> String {
        let exception = match &self.location {
            Some(location) => format!("{} at {}", self.exception, location),
            None => self.exception.clone(),
        };
        format!(
            "\n{rule}\nTIME: {}\nEXCEPTION: {}\n{rule}\n{}",
            format_time(&self.time),
            exception,
            self.backtrace,
            rule = RULE
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrashRecorder {
    namer: DumpFileNamer,
}

impl CrashRecorder {
    /// Recorder writing under the running binary's directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            namer: DumpFileNamer::with_base_dir(base_dir),
        }
    }

    /// Run `f`, turning a panic into a dump file and `None`
    pub fn guard<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        install_panic_hook();
        // Whatever an earlier panic on this thread left behind is not ours
        drop(take_capture());

        let active = ActiveGuard::enter();
        let outcome = panic::catch_unwind(AssertUnwindSafe(f));
        drop(active);

        match outcome {
            Ok(value) => Some(value),
            Err(payload) => {
                self.recover(payload.as_ref());
                None
            }
        }
    }

    /// Run `f` on a new thread behind this recorder's guard
    pub fn spawn<F, T>(&self, f: F) -> JoinHandle<Option<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let recorder = self.clone();
        thread::spawn(move || recorder.guard(f))
    }

    /// Persist a caught panic; returns the dump path when it could be created
    pub fn recover(&self, payload: &(dyn Any + Send)) -> Option<PathBuf> {
        let capture = take_capture();
        let (location, backtrace) = match capture {
            Some(c) => (c.location, c.backtrace),
            None => (None, Backtrace::force_capture().to_string()),
        };

        self.write(&DumpRecord {
            time: Local::now(),
            exception: describe_payload(payload),
            location,
            backtrace,
        })
    }

    /// Append a record to a fresh dump file and mirror it to stdout
    pub fn write(&self, record: &DumpRecord) -> Option<PathBuf> {
        let text = record.render();

        // The handle is closed when it drops, whichever way this returns
        let (path, mut file) = match self.namer.create(&record.time) {
            Ok(created) => created,
            Err(e) => {
                println!("{}", e);
                return None;
            }
        };

        if let Err(e) = writeln!(file, "{}", text) {
            println!("{}", e);
        }
        println!("{}", text);

        report(&path, record);
        Some(path)
    }
}

fn report(path: &Path, record: &DumpRecord) {
    crate::registry::error(
        "[catch_exception] recovered panic",
        &[
            Field::new("exception", record.exception.as_str()),
            Field::new("dump", path.display().to_string()),
        ],
    );
}

/// Guard `f` with a recorder rooted at the binary's directory.
///
/// # Example
/// ```no_run
/// use rust_logger_facade::catch_exception;
///
/// let outcome = catch_exception(|| {
///     let items: Vec<u32> = Vec::new();
///     items[3]
/// });
/// assert!(outcome.is_none());
/// // execution continues here
/// ```
pub fn catch_exception<F, R>(f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    CrashRecorder::new().guard(f)
}

/// Spawn a thread whose whole body is guarded
pub fn spawn_guarded<F, T>(f: F) -> JoinHandle<Option<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    CrashRecorder::new().spawn(f)
}
