//! Durable storage on the local filesystem
//!
//! Each attribute is one file at `root/XXX/YYY/ZZZ/<type>_<id>/<attribute>`.
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so a concurrent reader sees either the old or the new content.
//! Removing a file also removes every directory it leaves empty, up to but
//! excluding the root.

use super::{Blob, TextStorage};
use crate::errors::{CacheError, Result};
use crate::paths::CachePath;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use textcache_utils::{prune_empty_ancestors, write_atomic};

#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Attribute file for `path`, refusing paths resolved under another root
    fn file_for(&self, path: &CachePath, attribute: &str) -> Result<PathBuf> {
        if path.root() != self.root.as_path() {
            return Err(CacheError::configuration(format!(
                "path '{}' was resolved under '{}' but this storage is rooted at '{}'",
                path,
                path.root().display(),
                self.root.display()
            )));
        }
        path.attribute_path(attribute)
    }
}

impl TextStorage for FileSystemStorage {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        let file = self.file_for(path, attribute)?;
        write_atomic(&file, blob.data()).map_err(storage_error("write attribute"))?;
        tracing::debug!(file = %file.display(), bytes = blob.len(), "wrote attribute");
        Ok(())
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        let file = self.file_for(path, attribute)?;
        match fs::read(&file) {
            Ok(data) => {
                tracing::debug!(file = %file.display(), bytes = data.len(), "read attribute");
                Ok(Some(Blob::new(data)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(file, "read attribute", e)),
        }
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        let file = self.file_for(path, attribute)?;
        match fs::metadata(&file) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(file, "check attribute", e)),
        }
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        let file = self.file_for(path, attribute)?;
        match fs::remove_file(&file) {
            Ok(()) => tracing::debug!(file = %file.display(), "removed attribute"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(file, "remove attribute", e)),
        }

        let pruned = prune_empty_ancestors(&path.dir(), &self.root)
            .map_err(storage_error("prune empty directories"))?;
        if pruned > 0 {
            tracing::trace!(dir = %path.dir().display(), pruned, "pruned empty directories");
        }
        Ok(())
    }
}

/// Map a utility error to an I/O error naming the storage operation
fn storage_error(operation: &'static str) -> impl FnOnce(textcache_core::Error) -> CacheError {
    move |error| match error {
        textcache_core::Error::FileSystem { path, source, .. } => {
            CacheError::io(path, operation, source)
        }
        other => other.into(),
    }
}
