//! Directory maintenance helpers

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use textcache_core::{Error, Result};

/// Check whether a directory exists and has no entries
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    match fs::read_dir(dir) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::file_system(dir, "read directory", e)),
    }
}

/// Remove `start` and each of its ancestors while they are empty.
///
/// The walk stops at the first non-empty directory, at a directory that no
/// longer exists, or on reaching `root`, which is never removed. Directories
/// outside `root` are never touched. Returns the number of directories removed.
pub fn prune_empty_ancestors(start: &Path, root: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || dir.as_os_str().is_empty() {
            break;
        }
        if !is_empty_dir(dir)? {
            break;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                tracing::trace!(dir = %dir.display(), "removed empty directory");
                removed += 1;
            }
            // Another writer repopulated or removed it first
            Err(e) if e.kind() == ErrorKind::NotFound => break,
            Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => break,
            Err(e) => return Err(Error::file_system(dir, "remove empty directory", e)),
        }

        current = dir.parent();
    }

    Ok(removed)
}
