//! Factory for creating storage backends at composition time

use super::{
    CompressedStorage, CompressionConfig, FileSystemStorage, MemoryStorage, MemoryStore,
    TextStorage,
};
use crate::errors::{CacheError, RecoveryHint, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Which backend variant stores the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    FileSystem,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::FileSystem => f.write_str("filesystem"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "filesystem" | "fs" | "file" | "disk" => Ok(BackendKind::FileSystem),
            "memory" | "mem" => Ok(BackendKind::Memory),
            _ => Err(CacheError::Configuration {
                message: format!("Unknown storage backend: {s}"),
                recovery_hint: RecoveryHint::UseDefault {
                    value: "filesystem".to_string(),
                },
            }),
        }
    }
}

/// Build the backend for `kind`, wrapped in compression when enabled.
///
/// `memory` is only used by the memory backend; passing the same handle to
/// every composition lets a test harness clear all of them at once.
pub fn create_storage(
    kind: BackendKind,
    root: &Path,
    compression: &CompressionConfig,
    memory: &MemoryStore,
) -> Result<Arc<dyn TextStorage>> {
    compression.validate()?;
    tracing::debug!(
        backend = %kind,
        root = %root.display(),
        compressed = compression.enabled,
        "creating text storage"
    );

    let storage: Arc<dyn TextStorage> = match (kind, compression.enabled) {
        (BackendKind::FileSystem, false) => Arc::new(FileSystemStorage::new(root)),
        (BackendKind::FileSystem, true) => Arc::new(CompressedStorage::with_level(
            FileSystemStorage::new(root),
            compression.level,
        )),
        (BackendKind::Memory, false) => Arc::new(MemoryStorage::new(memory.clone())),
        (BackendKind::Memory, true) => Arc::new(CompressedStorage::with_level(
            MemoryStorage::new(memory.clone()),
            compression.level,
        )),
    };

    Ok(storage)
}
