//! File-backed state store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{StateStore, StoreError};

/// A [`StateStore`] that keeps the blob in a single file.
///
/// Writes go to a sibling `*.tmp` file first and are then renamed over
/// the target, so a reader never observes a half-written blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for `path`. Nothing is touched on disk until the
    /// first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed(e)),
        }
    }

    fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(StoreError::WriteFailed)?;
            }
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, data).map_err(StoreError::WriteFailed)?;
        std::fs::rename(&tmp, &self.path).map_err(StoreError::WriteFailed)?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = data.len(),
            "state file written"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
