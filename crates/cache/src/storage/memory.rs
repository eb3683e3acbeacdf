//! Ephemeral in-process storage
//!
//! The map lives in a `MemoryStore` handle that is created explicitly and
//! handed to each `MemoryStorage`. Clones of the handle share the same map,
//! so test harnesses keep one handle and call `clear` between cases.

use super::{Blob, TextStorage};
use crate::errors::Result;
use crate::paths::CachePath;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared map from flattened storage key to stored bytes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored value
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        tracing::debug!(entries = entries.len(), "clearing memory store");
        entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Raw stored bytes for a key, exactly as the backend received them
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Stored keys in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn insert(&self, key: String, data: Vec<u8>) {
        self.entries.write().insert(key, data);
    }

    fn take(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.write().remove(key)
    }
}

/// Backend keeping blobs in a `MemoryStore`; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    store: MemoryStore,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl TextStorage for MemoryStorage {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        let key = path.storage_key(attribute)?;
        tracing::debug!(%key, bytes = blob.len(), "memory write");
        self.store.insert(key, blob.data().to_vec());
        Ok(())
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        let key = path.storage_key(attribute)?;
        Ok(self.store.raw(&key).map(Blob::new))
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        let key = path.storage_key(attribute)?;
        Ok(self.store.contains_key(&key))
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        let key = path.storage_key(attribute)?;
        if self.store.take(&key).is_some() {
            tracing::debug!(%key, "memory remove");
        }
        Ok(())
    }
}
