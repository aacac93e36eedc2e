//! Core types for the allocation state and its persisted form.
//!
//! Field names serialize in camelCase so the blob matches what a browser
//! front end reads and writes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The unique key of a room, e.g. `"101"`.
///
/// Serialized as a plain string (`#[serde(transparent)]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomNumber(pub String);

impl RoomNumber {
    /// Creates a room number from anything string-like.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An opaque, unique identifier for a request.
///
/// Generated ids are 128 random bits rendered as 32 lowercase hex
/// characters. Ids restored from storage are accepted as-is; only
/// uniqueness within the request collection matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Creates an id from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draws a fresh random id.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; 16] = rng.random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a request.
///
/// ```text
/// Pending ──(approve)──→ Approved
///    └─────(reject)───→ Rejected
/// ```
///
/// Both `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Returns `true` for `Approved` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns `true` if moving from `self` to `target` is a legal
    /// transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A fixed-capacity housing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique key.
    pub number: RoomNumber,
    /// Total slots.
    pub capacity: u32,
    /// Slots consumed by approved requests (and the seeded baseline).
    /// Always `<= capacity` in a valid state.
    pub occupied: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(number: impl Into<String>, capacity: u32, occupied: u32) -> Self {
        Self {
            number: RoomNumber::new(number),
            capacity,
            occupied,
        }
    }

    /// Capacity minus occupied. Saturates at zero so a corrupt record
    /// can't underflow.
    pub fn free_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    /// Returns `true` if at least `slots` are free.
    pub fn has_room_for(&self, slots: u32) -> bool {
        self.free_slots() >= slots
    }
}

/// A room paired with its free-slot count, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    pub room: Room,
    pub free_slots: u32,
}

impl From<&Room> for RoomAvailability {
    fn from(room: &Room) -> Self {
        Self {
            free_slots: room.free_slots(),
            room: room.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// An applicant's claim on slots in a specific room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub applicant_name: String,
    pub enrollment_id: String,
    pub contact: String,
    pub room_number: RoomNumber,
    /// Slots this request consumes once approved.
    pub occupant_count: u32,
    /// Informational only; not checked against capacity.
    pub roommate_count: u32,
    pub status: RequestStatus,
    /// Milliseconds since the UNIX epoch.
    pub submitted_at: u64,
}

// ---------------------------------------------------------------------------
// AllocationState
// ---------------------------------------------------------------------------

/// The default rooms: `(number, capacity, occupied)`.
pub const SEED_ROOMS: [(&str, u32, u32); 7] = [
    ("101", 2, 0),
    ("102", 2, 0),
    ("103", 3, 0),
    ("104", 3, 1),
    ("105", 2, 2),
    ("106", 3, 0),
    ("107", 2, 0),
];

/// The complete allocation record: every room and every request ever
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationState {
    /// Rooms in display order.
    pub rooms: Vec<Room>,
    /// Requests in creation order (oldest first).
    pub requests: Vec<Request>,
}

impl AllocationState {
    /// The fallback state used when nothing valid is stored: the
    /// [`SEED_ROOMS`] and no requests.
    pub fn seeded() -> Self {
        Self {
            rooms: SEED_ROOMS
                .iter()
                .map(|(number, capacity, occupied)| Room::new(*number, *capacity, *occupied))
                .collect(),
            requests: Vec::new(),
        }
    }

    /// Looks up a room by number.
    pub fn room(&self, number: &RoomNumber) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.number == number)
    }

    /// Looks up a room by number, mutably.
    pub fn room_mut(&mut self, number: &RoomNumber) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| &r.number == number)
    }

    /// Looks up a request by id.
    pub fn request(&self, id: &RequestId) -> Option<&Request> {
        self.requests.iter().find(|r| &r.id == id)
    }

    /// Looks up a request by id, mutably.
    pub fn request_mut(&mut self, id: &RequestId) -> Option<&mut Request> {
        self.requests.iter_mut().find(|r| &r.id == id)
    }

    /// Checks the structural invariants of a state restored from
    /// storage.
    ///
    /// Requests whose room is missing are allowed: rooms may disappear
    /// from restored data and that is reported when the request is
    /// approved, not here.
    ///
    /// Slots held by approved requests in a room may not exceed its
    /// `occupied` count, which also carries the seeded baseline.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidState`] describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let mut numbers = HashSet::with_capacity(self.rooms.len());
        for room in &self.rooms {
            if room.number.as_str().trim().is_empty() {
                return Err(ProtocolError::InvalidState(
                    "room with empty number".into(),
                ));
            }
            if !numbers.insert(&room.number) {
                return Err(ProtocolError::InvalidState(format!(
                    "duplicate room number {}",
                    room.number
                )));
            }
            if room.occupied > room.capacity {
                return Err(ProtocolError::InvalidState(format!(
                    "room {} has {} occupied of {} capacity",
                    room.number, room.occupied, room.capacity
                )));
            }
        }

        let mut ids = HashSet::with_capacity(self.requests.len());
        let mut approved_slots: HashMap<&RoomNumber, u64> = HashMap::new();
        for request in &self.requests {
            if !ids.insert(&request.id) {
                return Err(ProtocolError::InvalidState(format!(
                    "duplicate request id {}",
                    request.id
                )));
            }
            if request.occupant_count == 0 {
                return Err(ProtocolError::InvalidState(format!(
                    "request {} has zero occupant count",
                    request.id
                )));
            }
            if request.roommate_count == 0 {
                return Err(ProtocolError::InvalidState(format!(
                    "request {} has zero roommate count",
                    request.id
                )));
            }
            if request.status == RequestStatus::Approved {
                *approved_slots.entry(&request.room_number).or_default() +=
                    u64::from(request.occupant_count);
            }
        }

        for room in &self.rooms {
            let approved = approved_slots.get(&room.number).copied().unwrap_or_default();
            if approved > u64::from(room.occupied) {
                return Err(ProtocolError::InvalidState(format!(
                    "room {} has {approved} approved slots but only {} occupied",
                    room.number, room.occupied
                )));
            }
        }

        Ok(())
    }
}

impl Default for AllocationState {
    fn default() -> Self {
        Self::seeded()
    }
}
