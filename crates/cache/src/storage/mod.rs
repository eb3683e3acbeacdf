//! Storage backends for attribute blobs
//!
//! This module provides:
//! - The `TextStorage` trait every backend implements
//! - `FileSystemStorage`, the durable backend writing under a root directory
//! - `MemoryStorage`, an ephemeral backend over an injectable `MemoryStore`
//! - `CompressedStorage`, a decorator deflating blobs for any backend
//! - `InstrumentedStorage`, a decorator counting backend calls
//!
//! Backends are synchronous and perform no retries; every I/O error is
//! returned to the caller.

mod blob;
mod compression;
mod factory;
mod filesystem;
mod instrumented;
mod memory;

pub use blob::{Blob, Encoding};
pub use compression::{decode_payload, encode_payload, CompressedStorage, CompressionConfig};
pub use factory::{create_storage, BackendKind};
pub use filesystem::FileSystemStorage;
pub use instrumented::{InstrumentedStorage, StorageStats};
pub use memory::{MemoryStorage, MemoryStore};

use crate::errors::Result;
use crate::paths::CachePath;
use std::fmt;
use std::sync::Arc;

/// Byte-level persistence addressed by (entity path, attribute name)
pub trait TextStorage: fmt::Debug + Send + Sync {
    /// Store the blob, replacing any previous value
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()>;

    /// Load the blob, or `None` when nothing is stored
    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>>;

    /// Check for a stored blob without loading it
    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool>;

    /// Delete the stored blob; a missing blob is not an error
    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()>;
}

impl<S: TextStorage + ?Sized> TextStorage for Arc<S> {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        (**self).write(path, attribute, blob)
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        (**self).read(path, attribute)
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        (**self).exists(path, attribute)
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        (**self).remove(path, attribute)
    }
}

impl<S: TextStorage + ?Sized> TextStorage for Box<S> {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        (**self).write(path, attribute, blob)
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        (**self).read(path, attribute)
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        (**self).exists(path, attribute)
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        (**self).remove(path, attribute)
    }
}
