//! Persistence adapter: the allocation state over a [`StateStore`].
//!
//! Loading never fails. Missing, unreadable, or corrupt data all fall
//! back to [`AllocationState::seeded`], and the reason is kept as a
//! [`LoadDiagnostic`] (and logged) so the caller can tell the
//! difference between "first run" and "the file was damaged".

use roomwise_protocol::{AllocationState, Codec, JsonCodec};
use roomwise_store::StateStore;

use crate::AllocationError;

/// Why the last `load` returned the seed instead of stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// The store was empty.
    NoPriorState,
    /// The store could not be read.
    Unreadable(String),
    /// The stored bytes did not decode, or decoded into a state that
    /// breaks a structural invariant.
    Corrupt(String),
}

/// Loads and saves the allocation state through a store and codec.
pub struct Persistence<S: StateStore, C: Codec = JsonCodec> {
    store: S,
    codec: C,
    last_diagnostic: Option<LoadDiagnostic>,
}

impl<S: StateStore> Persistence<S, JsonCodec> {
    /// Creates an adapter that stores JSON.
    pub fn new(store: S) -> Self {
        Self::with_codec(store, JsonCodec)
    }
}

impl<S: StateStore, C: Codec> Persistence<S, C> {
    /// Creates an adapter with an explicit codec.
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            last_diagnostic: None,
        }
    }

    /// Reads and validates the stored state.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    /// - [`AllocationError::Store`] — the store could not be read
    /// - [`AllocationError::PersistenceCorrupt`] — the bytes did not
    ///   decode or the state is structurally invalid
    pub fn try_load(&self) -> Result<Option<AllocationState>, AllocationError> {
        let Some(bytes) = self.store.read()? else {
            return Ok(None);
        };

        let state: AllocationState = self
            .codec
            .decode(&bytes)
            .map_err(|e| AllocationError::PersistenceCorrupt(e.to_string()))?;
        state
            .validate()
            .map_err(|e| AllocationError::PersistenceCorrupt(e.to_string()))?;

        Ok(Some(state))
    }

    /// Returns the stored state, or the seed if there is none or it is
    /// unusable. Records a [`LoadDiagnostic`] whenever the seed is used.
    pub fn load(&mut self) -> AllocationState {
        let location = self.store.location();
        match self.try_load() {
            Ok(Some(state)) => {
                self.last_diagnostic = None;
                tracing::info!(
                    %location,
                    rooms = state.rooms.len(),
                    requests = state.requests.len(),
                    "allocation state restored"
                );
                state
            }
            Ok(None) => {
                self.last_diagnostic = Some(LoadDiagnostic::NoPriorState);
                tracing::info!(%location, "no stored state, using seed");
                AllocationState::seeded()
            }
            Err(AllocationError::PersistenceCorrupt(reason)) => {
                tracing::warn!(%location, %reason, "stored state is corrupt, using seed");
                self.last_diagnostic = Some(LoadDiagnostic::Corrupt(reason));
                AllocationState::seeded()
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(%location, %reason, "stored state unreadable, using seed");
                self.last_diagnostic = Some(LoadDiagnostic::Unreadable(reason));
                AllocationState::seeded()
            }
        }
    }

    /// Encodes and writes `state`.
    ///
    /// # Errors
    /// Returns [`AllocationError::Protocol`] if encoding fails or
    /// [`AllocationError::Store`] if the write fails.
    pub fn save(&self, state: &AllocationState) -> Result<(), AllocationError> {
        let bytes = self.codec.encode(state)?;
        self.store.write(&bytes)?;
        Ok(())
    }

    /// The diagnostic recorded by the most recent [`load`](Self::load),
    /// or `None` if it restored stored data (or hasn't run).
    pub fn last_diagnostic(&self) -> Option<&LoadDiagnostic> {
        self.last_diagnostic.as_ref()
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
