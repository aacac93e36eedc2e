/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the stored bytes failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// Writing the stored bytes failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// An in-process store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}
