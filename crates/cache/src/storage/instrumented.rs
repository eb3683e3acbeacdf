//! Call counting for storage backends

use super::{Blob, TextStorage};
use crate::errors::Result;
use crate::paths::CachePath;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Backend call counters with atomic updates
#[derive(Debug, Default)]
pub struct StorageStats {
    pub reads: AtomicU64,
    pub hits: AtomicU64,
    pub writes: AtomicU64,
    pub exists_checks: AtomicU64,
    pub removals: AtomicU64,
    pub errors: AtomicU64,
}

impl StorageStats {
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Reads that found a stored value
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn exists_checks(&self) -> u64 {
        self.exists_checks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Total backend calls of any kind
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.reads() + self.writes() + self.exists_checks() + self.removals()
    }

    pub fn hit_rate(&self) -> f64 {
        let reads = self.reads();
        if reads == 0 {
            0.0
        } else {
            self.hits() as f64 / reads as f64
        }
    }

    fn record<T>(&self, counter: &AtomicU64, result: &Result<T>) {
        counter.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Decorator recording every call made to the wrapped backend
#[derive(Debug, Clone)]
pub struct InstrumentedStorage<S> {
    inner: S,
    stats: Arc<StorageStats>,
}

impl<S: TextStorage> InstrumentedStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: Arc::new(StorageStats::default()),
        }
    }

    /// Shared handle to the counters; stays valid after the storage is moved
    #[must_use]
    pub fn stats(&self) -> Arc<StorageStats> {
        Arc::clone(&self.stats)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TextStorage> TextStorage for InstrumentedStorage<S> {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        let result = self.inner.write(path, attribute, blob);
        self.stats.record(&self.stats.writes, &result);
        result
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        let result = self.inner.read(path, attribute);
        self.stats.record(&self.stats.reads, &result);
        if matches!(result, Ok(Some(_))) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        let result = self.inner.exists(path, attribute);
        self.stats.record(&self.stats.exists_checks, &result);
        result
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        let result = self.inner.remove(path, attribute);
        self.stats.record(&self.stats.removals, &result);
        result
    }
}
