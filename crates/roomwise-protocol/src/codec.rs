//! Codec trait and implementations for serializing the allocation state.
//!
//! The persistence adapter doesn't care HOW the state is serialized; it
//! needs something that implements [`Codec`]. [`JsonCodec`] is the only
//! implementation today and produces the human-readable blob that ends
//! up in the state file.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that writes pretty-printed JSON (via `serde_json`).
///
/// Pretty output keeps the state file diffable and hand-editable.
///
/// ## Example
///
/// ```rust
/// use roomwise_protocol::{AllocationState, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let state = AllocationState::seeded();
///
/// let bytes = codec.encode(&state).unwrap();
/// let decoded: AllocationState = codec.decode(&bytes).unwrap();
/// assert_eq!(state, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec_pretty(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
