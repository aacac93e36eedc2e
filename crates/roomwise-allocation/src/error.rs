//! Error types for the allocation layer.
//!
//! Messages are short enough to show to an applicant or administrator
//! as-is.

use roomwise_protocol::{ProtocolError, RequestId, RequestStatus, RoomNumber};
use roomwise_store::StoreError;

/// Errors that can occur during allocation operations.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// A required field is missing or out of range.
    #[error("invalid application: {0}")]
    Validation(String),

    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomNumber),

    /// The room has fewer free slots than the request needs.
    #[error("room {0} has no free slot")]
    RoomFull(RoomNumber),

    /// No request has this id.
    #[error("request {0} not found")]
    RequestNotFound(RequestId),

    /// The request already reached a terminal status.
    #[error("request {id} is already {status}")]
    InvariantViolation {
        id: RequestId,
        status: RequestStatus,
    },

    /// Stored data could not be parsed or is structurally invalid.
    #[error("stored state is corrupt: {0}")]
    PersistenceCorrupt(String),

    /// Encoding the state failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The state store failed to read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
