//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means "these bytes (or this value) are not a
//! well-formed allocation state". It never describes a rule violation
//! such as a full room; those live in the allocation layer.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    ///
    /// Common causes: malformed JSON, missing required fields, or a
    /// field of the wrong type (e.g. `"rooms": "not an array"`).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value parsed, but violates a structural invariant of the
    /// state, e.g. two rooms with the same number or `occupied` above
    /// `capacity`.
    #[error("invalid state: {0}")]
    InvalidState(String),
}
