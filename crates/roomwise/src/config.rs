//! Desk configuration loaded from the environment.

use std::env;
use std::fmt::Display;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

use roomwise_allocation::AllocationConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable naming the state file.
pub const STATE_PATH_VAR: &str = "ROOMWISE_STATE_PATH";
/// Environment variable selecting the reject policy.
pub const REJECT_POLICY_VAR: &str = "ROOMWISE_REJECT_POLICY";
/// Environment variable setting slots consumed per request.
pub const OCCUPANTS_VAR: &str = "ROOMWISE_OCCUPANTS_PER_REQUEST";

/// Everything needed to open a desk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Where the state file lives. `None` keeps state in memory only.
    pub state_path: Option<PathBuf>,
    pub allocation: AllocationConfig,
}

impl DeskConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// Missing or unparsable values fall back to defaults with a log
    /// line, as does an occupant count of zero; this never fails.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup, so
    /// callers (and tests) can supply their own source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AllocationConfig::default();

        let state_path = match lookup(STATE_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
            _ => {
                info!("{STATE_PATH_VAR} not set, state kept in memory");
                None
            }
        };

        Self {
            state_path,
            allocation: AllocationConfig {
                occupants_per_request: try_load(
                    &lookup,
                    OCCUPANTS_VAR,
                    NonZeroU32::new(defaults.occupants_per_request).unwrap_or(NonZeroU32::MIN),
                )
                .get(),
                reject_policy: try_load(&lookup, REJECT_POLICY_VAR, defaults.reject_policy),
            },
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
