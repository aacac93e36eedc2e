//! Room allocation rules for Roomwise.
//!
//! The [`AllocationManager`] owns the one [`AllocationState`] of the
//! process and is the only thing that mutates it. Every mutation is
//! checked against the slot-accounting rules, then written through the
//! [`Persistence`] adapter.
//!
//! # Key types
//!
//! - [`AllocationManager`] — submit/approve/reject and the read queries
//! - [`Application`] — the input to a submission
//! - [`Persistence`] — load-with-fallback and save over a `StateStore`
//! - [`AllocationConfig`] — per-request slot count and reject policy
//!
//! [`AllocationState`]: roomwise_protocol::AllocationState

mod application;
mod config;
mod error;
mod manager;
mod persistence;

pub use application::Application;
pub use config::{AllocationConfig, RejectPolicy};
pub use error::AllocationError;
pub use manager::{AllocationManager, AllocationSummary};
pub use persistence::{LoadDiagnostic, Persistence};
