//! State store abstraction layer for Roomwise.
//!
//! Provides the [`StateStore`] trait: a place that holds exactly one
//! serialized blob (the allocation state). The store knows nothing about
//! the shape of that blob; encoding lives in `roomwise-protocol`.
//!
//! # Feature Flags
//!
//! - `file` (default) — file-backed store ([`FileStore`])

mod error;
#[cfg(feature = "file")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "file")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Holds a single serialized state blob.
///
/// Every call is synchronous: `write` returns only once the bytes are
/// handed to the backing medium.
pub trait StateStore: Send + Sync + 'static {
    /// Reads the stored blob.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the stored blob with `data`.
    fn write(&self, data: &[u8]) -> Result<(), StoreError>;

    /// Human-readable location, used in log fields.
    fn location(&self) -> String {
        "memory".to_string()
    }
}

impl<S: StateStore> StateStore for std::sync::Arc<S> {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).read()
    }

    fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        (**self).write(data)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_arc_store_delegates_to_inner() {
        let store = Arc::new(MemoryStore::new());
        store.write(b"abc").unwrap();

        let shared: Arc<MemoryStore> = Arc::clone(&store);
        assert_eq!(StateStore::read(&shared).unwrap(), Some(b"abc".to_vec()));
        assert_eq!(StateStore::location(&shared), "memory");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Poisoned;
        assert_eq!(err.to_string(), "store lock poisoned");
    }
}
