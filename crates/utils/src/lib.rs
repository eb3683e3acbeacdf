//! Shared utilities for textcache
//!
//! Small filesystem helpers used by the durable storage backend, and the
//! opt-in tracing subscriber setup.

pub mod atomic_file;
pub mod directory;
pub mod tracing;

pub use atomic_file::*;
pub use directory::*;
