//! Data model and persisted format for Roomwise.
//!
//! This crate defines the shape of the single state blob that the
//! allocation layer owns and the persistence adapter stores:
//!
//! - **Types** ([`AllocationState`], [`Room`], [`Request`],
//!   [`RequestStatus`], etc.) — the records and their serialized form.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how the state is
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding, decoding, or structural validation.
//!
//! # Architecture
//!
//! ```text
//! Store (bytes) → Protocol (AllocationState) → Allocation (rules)
//! ```
//!
//! The protocol layer enforces the *shape* of a state (unique keys,
//! counters in range). The allocation layer enforces the *rules* for
//! moving from one valid state to the next.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AllocationState, Request, RequestId, RequestStatus, Room, RoomAvailability,
    RoomNumber, SEED_ROOMS,
};
