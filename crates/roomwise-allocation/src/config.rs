//! Allocation configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RejectPolicy
// ---------------------------------------------------------------------------

/// How `reject_request` treats a request that is no longer pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RejectPolicy {
    /// Rejecting a non-pending request fails with `InvariantViolation`.
    #[default]
    Guarded,
    /// Rejecting always sets the status to `Rejected`, even over an
    /// approval. Slots consumed by the approval are not returned.
    Overwrite,
}

impl fmt::Display for RejectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guarded => write!(f, "guarded"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl FromStr for RejectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guarded" => Ok(Self::Guarded),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!(
                "unknown reject policy {other:?} (expected guarded or overwrite)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// AllocationConfig
// ---------------------------------------------------------------------------

/// Configuration for an [`AllocationManager`](crate::AllocationManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Slots each request consumes when approved, regardless of the
    /// roommate count on the application. Must be at least 1.
    pub occupants_per_request: u32,

    /// What rejecting an already-decided request does.
    pub reject_policy: RejectPolicy,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            occupants_per_request: 1,
            reject_policy: RejectPolicy::Guarded,
        }
    }
}
