//! Atomic file operations so readers never observe a half-written blob

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use textcache_core::{Error, Result};
use uuid::Uuid;

/// Replace `path` with `content` in one step.
///
/// Missing parent directories are created first. Bytes are staged in a
/// uniquely named sibling file, flushed to disk, then renamed over `path`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::configuration(format!("'{}' has no parent directory", path.display()))
    })?;
    fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, "create directory", e))?;

    let mut staged = StagedFile::create(dir)?;
    staged.fill(content)?;
    staged.persist(path)
}

/// Sibling temp file, deleted on drop unless persisted
struct StagedFile {
    path: PathBuf,
    file: Option<File>,
    persisted: bool,
}

impl StagedFile {
    fn create(dir: &Path) -> Result<Self> {
        let path = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::file_system(&path, "create staging file", e))?;
        Ok(Self {
            path,
            file: Some(file),
            persisted: false,
        })
    }

    fn fill(&mut self, content: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(Error::configuration("staging file is already closed"));
        };
        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::file_system(&self.path, "write staging file", e))
    }

    fn persist(mut self, destination: &Path) -> Result<()> {
        drop(self.file.take());
        fs::rename(&self.path, destination)
            .map_err(|e| Error::file_system(destination, "rename staging file", e))?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}
