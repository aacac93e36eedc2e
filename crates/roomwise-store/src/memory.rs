//! In-memory state store.

use std::sync::{Arc, Mutex};

use crate::{StateStore, StoreError};

/// A [`StateStore`] that keeps the blob in process memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// allocation layer and inspect (or corrupt) the bytes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `data`.
    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(Some(data.into()))),
        }
    }

    /// Returns a copy of the stored blob, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StateStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        let mut guard = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(data.to_vec());
        tracing::trace!(bytes = data.len(), "memory store written");
        Ok(())
    }
}
