//! Unified error type for Roomwise.

use roomwise_allocation::AllocationError;
use roomwise_protocol::ProtocolError;
use roomwise_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomwiseError {
    /// A store-level error (read, write).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A protocol-level error (encode, decode, invalid state).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An allocation-level error (validation, full room, bad transition).
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The desk configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A global tracing subscriber could not be installed.
    #[error("logging init failed: {0}")]
    Logging(String),
}
