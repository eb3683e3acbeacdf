//! Binding of a path resolver to a storage backend

use crate::config::TextCacheConfig;
use crate::errors::Result;
use crate::paths::{CachePath, PathResolver};
use crate::storage::{create_storage, MemoryStorage, MemoryStore, TextStorage};
use std::path::PathBuf;
use std::sync::Arc;
use textcache_core::EntityIdentity;

/// Everything an attribute slot needs to reach its stored bytes.
///
/// Cloning is cheap; one store is usually shared by every instance of a host
/// type.
#[derive(Debug, Clone)]
pub struct TextStore {
    resolver: PathResolver,
    storage: Arc<dyn TextStorage>,
}

impl TextStore {
    pub fn new(resolver: PathResolver, storage: Arc<dyn TextStorage>) -> Self {
        Self { resolver, storage }
    }

    /// Store over any backend rooted at `root`
    pub fn with_storage(root: impl Into<PathBuf>, storage: impl TextStorage + 'static) -> Self {
        Self::new(PathResolver::new(root), Arc::new(storage))
    }

    /// In-memory store at the default root, sharing `store`
    #[must_use]
    pub fn in_memory(store: &MemoryStore) -> Self {
        Self::new(
            PathResolver::default(),
            Arc::new(MemoryStorage::new(store.clone())),
        )
    }

    /// Compose a store from configuration.
    ///
    /// `memory` backs the store when the configuration selects the memory
    /// backend and is ignored otherwise.
    pub fn from_config(config: &TextCacheConfig, memory: &MemoryStore) -> Result<Self> {
        config.validate()?;
        let root = config.resolved_root();
        let storage = create_storage(config.backend_kind(), &root, &config.compression, memory)?;
        Ok(Self::new(PathResolver::new(root), storage))
    }

    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    #[must_use]
    pub fn storage(&self) -> &dyn TextStorage {
        self.storage.as_ref()
    }

    /// Storage path for an entity; fails for entities without an id
    pub fn path_for(&self, identity: &EntityIdentity) -> Result<CachePath> {
        self.resolver.resolve(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BackendKind, Blob};
    use tempfile::TempDir;
    use textcache_core::Environment;

    #[test]
    fn test_from_config_uses_memory_for_test_environment() {
        let memory = MemoryStore::new();
        let config = TextCacheConfig::builder()
            .with_environment(Environment::Test)
            .build();
        let store = TextStore::from_config(&config, &memory).unwrap();

        let path = store.path_for(&EntityIdentity::new("TestModel", 1)).unwrap();
        store.storage().write(&path, "foo", &Blob::from_text("x")).unwrap();

        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_from_config_uses_filesystem_under_resolved_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = TextCacheConfig::builder()
            .with_base_dir(temp_dir.path())
            .with_environment(Environment::Production)
            .with_backend(BackendKind::FileSystem)
            .build();
        let store = TextStore::from_config(&config, &MemoryStore::new()).unwrap();

        let path = store.path_for(&EntityIdentity::new("TestModel", 1)).unwrap();
        store.storage().write(&path, "foo", &Blob::from_text("x")).unwrap();

        let expected_root = temp_dir.path().join("text_cache").join("production");
        assert_eq!(store.resolver().root(), expected_root.as_path());
        assert!(path.attribute_path("foo").unwrap().starts_with(&expected_root));
        assert!(path.attribute_path("foo").unwrap().exists());
    }

    #[test]
    fn test_path_for_transient_entity_fails() {
        let store = TextStore::in_memory(&MemoryStore::new());
        let err = store
            .path_for(&EntityIdentity::transient("TestModel"))
            .unwrap_err();
        assert!(err.is_precondition());
    }
}
