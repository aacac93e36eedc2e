//! # Roomwise
//!
//! Room allocation desk: a fixed set of rooms with capacity counters,
//! applications that become pending requests, and approve/reject
//! decisions that consume slots. All state is one owned value written
//! through to a local store after every change.
//!
//! ## Quick Start
//!
//! ```rust
//! use roomwise::prelude::*;
//!
//! # fn main() -> Result<(), RoomwiseError> {
//! let mut desk = AllocationDesk::builder().in_memory().build()?;
//!
//! let request = desk.submit_request(Application::new("Alice", "E1", "c1", "101", 2))?;
//! desk.approve_request(&request.id)?;
//!
//! assert_eq!(desk.room(&RoomNumber::new("101")).map(|r| r.occupied), Some(1));
//! # Ok(())
//! # }
//! ```

mod config;
mod desk;
mod error;
pub mod logging;

pub use config::{DeskConfig, OCCUPANTS_VAR, REJECT_POLICY_VAR, STATE_PATH_VAR};
pub use desk::{AllocationDesk, AllocationDeskBuilder, DeskBuilderExt, DeskStore};
pub use error::RoomwiseError;

/// Everything a desk front end typically needs, in one import.
pub mod prelude {
    pub use crate::{
        AllocationDesk, AllocationDeskBuilder, DeskBuilderExt, DeskConfig, RoomwiseError,
    };
    pub use roomwise_allocation::{
        AllocationConfig, AllocationError, AllocationSummary, Application, LoadDiagnostic,
        RejectPolicy,
    };
    pub use roomwise_protocol::{
        Request, RequestId, RequestStatus, Room, RoomAvailability, RoomNumber,
    };
}
