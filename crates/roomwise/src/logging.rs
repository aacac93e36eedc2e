//! Tracing subscriber setup for binaries built on Roomwise.
//!
//! Library crates only emit `tracing` events; installing a subscriber
//! is left to the application, usually by calling [`init`] first thing
//! in `main`.

use tracing_subscriber::EnvFilter;

use crate::RoomwiseError;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// # Errors
/// Returns [`RoomwiseError::Logging`] if a global subscriber is already
/// installed.
pub fn init() -> Result<(), RoomwiseError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| RoomwiseError::Logging(e.to_string()))
}
