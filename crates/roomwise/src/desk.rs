//! `AllocationDesk` builder.
//!
//! This is the entry point for running Roomwise. It picks a store,
//! wraps it in the persistence adapter, and opens the allocation
//! manager on it.

use std::path::PathBuf;

use roomwise_allocation::{AllocationConfig, AllocationManager, Persistence};
use roomwise_store::{FileStore, MemoryStore, StateStore, StoreError};

use crate::{DeskConfig, RoomwiseError};

/// The store behind a desk: a state file, or process memory.
#[derive(Debug, Clone)]
pub enum DeskStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl StateStore for DeskStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            Self::File(store) => store.read(),
            Self::Memory(store) => store.read(),
        }
    }

    fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.write(data),
            Self::Memory(store) => store.write(data),
        }
    }

    fn location(&self) -> String {
        match self {
            Self::File(store) => store.location(),
            Self::Memory(store) => store.location(),
        }
    }
}

/// An allocation manager over a [`DeskStore`].
pub type AllocationDesk = AllocationManager<DeskStore>;

/// Builder for configuring and opening an [`AllocationDesk`].
///
/// # Example
///
/// ```rust,no_run
/// use roomwise::prelude::*;
///
/// # fn main() -> Result<(), RoomwiseError> {
/// let mut desk = AllocationDesk::builder()
///     .state_path("/var/lib/roomwise/state.json")
///     .build()?;
/// let request = desk.submit_request(Application::new("Alice", "E1", "alice@example.com", "101", 2))?;
/// desk.approve_request(&request.id)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AllocationDeskBuilder {
    store: Option<DeskStore>,
    config: AllocationConfig,
}

impl AllocationDeskBuilder {
    /// Creates a builder with an in-memory store and default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a [`DeskConfig`], e.g. one read from the environment.
    pub fn from_config(config: DeskConfig) -> Self {
        let builder = Self::new().config(config.allocation);
        match config.state_path {
            Some(path) => builder.state_path(path),
            None => builder.in_memory(),
        }
    }

    /// Persists state to the file at `path`.
    pub fn state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = Some(DeskStore::File(FileStore::new(path)));
        self
    }

    /// Keeps state in a fresh in-memory store.
    pub fn in_memory(self) -> Self {
        self.memory_store(MemoryStore::new())
    }

    /// Keeps state in the given in-memory store. Clones of the store
    /// observe every write.
    pub fn memory_store(mut self, store: MemoryStore) -> Self {
        self.store = Some(DeskStore::Memory(store));
        self
    }

    /// Sets the allocation configuration.
    pub fn config(mut self, config: AllocationConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads (or seeds) the state and opens the desk.
    ///
    /// # Errors
    /// Returns [`RoomwiseError::Config`] if `occupants_per_request` is 0.
    pub fn build(self) -> Result<AllocationDesk, RoomwiseError> {
        if self.config.occupants_per_request == 0 {
            return Err(RoomwiseError::Config(
                "occupants_per_request must be at least 1".into(),
            ));
        }

        let store = self
            .store
            .unwrap_or_else(|| DeskStore::Memory(MemoryStore::new()));
        tracing::info!(location = %store.location(), "opening allocation desk");

        Ok(AllocationManager::open(Persistence::new(store), self.config))
    }
}

/// Entry point for the builder, so callers can write
/// `AllocationDesk::builder()`.
pub trait DeskBuilderExt {
    /// Returns a new [`AllocationDeskBuilder`].
    fn builder() -> AllocationDeskBuilder;
}

impl DeskBuilderExt for AllocationDesk {
    fn builder() -> AllocationDeskBuilder {
        AllocationDeskBuilder::new()
    }
}
