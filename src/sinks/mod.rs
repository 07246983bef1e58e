//! Sink implementations

pub mod console;
pub mod rotating_file;
pub mod routed;

pub use console::ConsoleSink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};
pub use routed::LevelRoutedSink;

pub use crate::core::Sink;
