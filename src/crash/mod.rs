//! Crash capture: dump file naming and the panic recovery boundary

pub mod dump_file;
pub mod recorder;

pub use dump_file::{binary_dir, DumpFileNamer};
pub use recorder::{
    catch_exception, describe_payload, install_panic_hook, spawn_guarded, CrashRecorder,
    DumpRecord,
};
