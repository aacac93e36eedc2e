//! Allocation manager: owns the state and enforces the slot rules.
//!
//! # Concurrency note
//!
//! `AllocationManager` is a plain owned value. Mutations take
//! `&mut self`, so exactly one caller can change the state at a time and
//! each operation runs to completion (including its write-through)
//! before the next starts. Sharing it across threads means wrapping it
//! in a `Mutex` at a higher level; the checks below would then need to
//! run inside the same critical section as the mutation they guard.

use std::time::{SystemTime, UNIX_EPOCH};

use roomwise_protocol::{
    AllocationState, Codec, JsonCodec, Request, RequestId, RequestStatus, Room,
    RoomAvailability, RoomNumber,
};
use roomwise_store::StateStore;
use serde::Serialize;

use crate::{AllocationConfig, AllocationError, Application, Persistence, RejectPolicy};

/// Counts across the whole state, for an administrator's overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllocationSummary {
    pub rooms: usize,
    pub total_capacity: u64,
    pub total_occupied: u64,
    pub total_free: u64,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Holds the canonical rooms and requests and applies every change to
/// them.
///
/// ## Lifecycle
///
/// ```text
/// open() ──→ submit_request() ──→ [Pending] ──approve_request()──→ [Approved]
///                                     │
///                                     └──────reject_request()────→ [Rejected]
/// ```
///
/// Each successful mutation is saved through the [`Persistence`]
/// adapter before the call returns. Save failures are logged and do not
/// undo the in-memory change.
pub struct AllocationManager<S: StateStore, C: Codec = JsonCodec> {
    state: AllocationState,
    persistence: Persistence<S, C>,
    config: AllocationConfig,
}

impl<S: StateStore, C: Codec> AllocationManager<S, C> {
    /// Loads the state through `persistence` (falling back to the seed)
    /// and returns a manager that owns it.
    pub fn open(mut persistence: Persistence<S, C>, config: AllocationConfig) -> Self {
        let state = persistence.load();
        tracing::info!(
            rooms = state.rooms.len(),
            requests = state.requests.len(),
            reject_policy = %config.reject_policy,
            "allocation manager ready"
        );
        Self {
            state,
            persistence,
            config,
        }
    }

    /// Creates a pending request for one application.
    ///
    /// Room occupancy is not touched; slots are only consumed on
    /// approval.
    ///
    /// # Errors
    /// - [`AllocationError::Validation`] — blank field or zero roommates
    /// - [`AllocationError::RoomNotFound`] — no room with that number
    /// - [`AllocationError::RoomFull`] — fewer free slots than a request
    ///   consumes
    pub fn submit_request(
        &mut self,
        application: Application,
    ) -> Result<Request, AllocationError> {
        let application = application.normalized().inspect_err(|e| {
            tracing::debug!(error = %e, "application rejected");
        })?;
        let slots = self.occupants_per_request()?;
        let room_number = RoomNumber::new(application.room_number);

        let room = self
            .state
            .room(&room_number)
            .ok_or_else(|| AllocationError::RoomNotFound(room_number.clone()))?;
        if !room.has_room_for(slots) {
            tracing::debug!(room = %room_number, free = room.free_slots(), "room full");
            return Err(AllocationError::RoomFull(room_number));
        }

        let request = Request {
            id: self.fresh_id(),
            applicant_name: application.applicant_name,
            enrollment_id: application.enrollment_id,
            contact: application.contact,
            room_number,
            occupant_count: slots,
            roommate_count: application.roommate_count,
            status: RequestStatus::Pending,
            submitted_at: now_millis(),
        };
        self.state.requests.push(request.clone());

        tracing::info!(
            request_id = %request.id,
            room = %request.room_number,
            "request submitted"
        );
        self.persist();
        Ok(request)
    }

    /// Approves a pending request and consumes its slots.
    ///
    /// Free slots are checked again here: other approvals may have used
    /// them up since the request was submitted.
    ///
    /// # Errors
    /// - [`AllocationError::RequestNotFound`] — unknown id
    /// - [`AllocationError::InvariantViolation`] — not pending
    /// - [`AllocationError::RoomNotFound`] — the room is gone
    /// - [`AllocationError::RoomFull`] — not enough free slots now
    pub fn approve_request(&mut self, id: &RequestId) -> Result<(), AllocationError> {
        let request = self.pending(id)?;
        let room_number = request.room_number.clone();
        let slots = request.occupant_count;

        let room = self
            .state
            .room_mut(&room_number)
            .ok_or_else(|| AllocationError::RoomNotFound(room_number.clone()))?;
        if !room.has_room_for(slots) {
            return Err(AllocationError::RoomFull(room_number));
        }
        room.occupied += slots;
        let occupied = room.occupied;

        if let Some(request) = self.state.request_mut(id) {
            request.status = RequestStatus::Approved;
        }

        tracing::info!(request_id = %id, room = %room_number, occupied, "request approved");
        self.persist();
        Ok(())
    }

    /// Rejects a request. Never changes room occupancy.
    ///
    /// Under [`RejectPolicy::Guarded`] only pending requests can be
    /// rejected. Under [`RejectPolicy::Overwrite`] any request is set to
    /// rejected, including approved ones, whose slots stay consumed.
    ///
    /// # Errors
    /// - [`AllocationError::RequestNotFound`] — unknown id
    /// - [`AllocationError::InvariantViolation`] — not pending (guarded
    ///   policy only)
    pub fn reject_request(&mut self, id: &RequestId) -> Result<(), AllocationError> {
        let previous = match self.config.reject_policy {
            RejectPolicy::Guarded => self.pending(id)?.status,
            RejectPolicy::Overwrite => {
                self.state
                    .request(id)
                    .ok_or_else(|| AllocationError::RequestNotFound(id.clone()))?
                    .status
            }
        };

        if let Some(request) = self.state.request_mut(id) {
            request.status = RequestStatus::Rejected;
        }

        if previous == RequestStatus::Approved {
            tracing::warn!(request_id = %id, "approved request overwritten as rejected");
        } else {
            tracing::info!(request_id = %id, "request rejected");
        }
        self.persist();
        Ok(())
    }

    /// Rooms with at least one free slot, in stored order.
    pub fn list_available_rooms(&self) -> Vec<RoomAvailability> {
        self.state
            .rooms
            .iter()
            .map(RoomAvailability::from)
            .filter(|a| a.free_slots > 0)
            .collect()
    }

    /// Every room with its free-slot count, in stored order.
    pub fn list_all_rooms(&self) -> Vec<RoomAvailability> {
        self.state.rooms.iter().map(RoomAvailability::from).collect()
    }

    /// Every request, most recently created first.
    pub fn list_requests(&self) -> Vec<&Request> {
        self.state.requests.iter().rev().collect()
    }

    /// Pending requests, oldest first (the order to work through them).
    pub fn pending_requests(&self) -> Vec<&Request> {
        self.state
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect()
    }

    /// Looks up a room by number.
    pub fn room(&self, number: &RoomNumber) -> Option<&Room> {
        self.state.room(number)
    }

    /// Looks up a request by id.
    pub fn request(&self, id: &RequestId) -> Option<&Request> {
        self.state.request(id)
    }

    /// Totals across all rooms and requests. Slot totals are `u64` so
    /// any number of `u32` rooms adds up without overflow.
    pub fn summary(&self) -> AllocationSummary {
        let mut summary = AllocationSummary {
            rooms: self.state.rooms.len(),
            ..AllocationSummary::default()
        };
        for room in &self.state.rooms {
            summary.total_capacity += u64::from(room.capacity);
            summary.total_occupied += u64::from(room.occupied);
            summary.total_free += u64::from(room.free_slots());
        }
        for request in &self.state.requests {
            match request.status {
                RequestStatus::Pending => summary.pending += 1,
                RequestStatus::Approved => summary.approved += 1,
                RequestStatus::Rejected => summary.rejected += 1,
            }
        }
        summary
    }

    /// The full current state.
    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    /// The configuration this manager was opened with.
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// The persistence adapter, e.g. to inspect its load diagnostic.
    pub fn persistence(&self) -> &Persistence<S, C> {
        &self.persistence
    }

    /// Looks up `id` and requires it to be pending.
    fn pending(&self, id: &RequestId) -> Result<&Request, AllocationError> {
        let request = self
            .state
            .request(id)
            .ok_or_else(|| AllocationError::RequestNotFound(id.clone()))?;
        if request.status != RequestStatus::Pending {
            return Err(AllocationError::InvariantViolation {
                id: id.clone(),
                status: request.status,
            });
        }
        Ok(request)
    }

    fn occupants_per_request(&self) -> Result<u32, AllocationError> {
        match self.config.occupants_per_request {
            0 => Err(AllocationError::Validation(
                "occupants per request must be at least 1".into(),
            )),
            n => Ok(n),
        }
    }

    /// Draws ids until one is not already used.
    fn fresh_id(&self) -> RequestId {
        loop {
            let id = RequestId::generate();
            if self.state.request(&id).is_none() {
                return id;
            }
        }
    }

    /// Write-through. Failures are logged only.
    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.state) {
            tracing::warn!(
                location = %self.persistence.store().location(),
                error = %e,
                "failed to save allocation state"
            );
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `AllocationManager`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //! Every test starts from the seed in a `MemoryStore`, so room
    //! numbers and counts below refer to the seeded rooms.

    use roomwise_store::{MemoryStore, StoreError};

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn manager() -> AllocationManager<MemoryStore> {
        manager_with(AllocationConfig::default())
    }

    fn manager_with(config: AllocationConfig) -> AllocationManager<MemoryStore> {
        AllocationManager::open(Persistence::new(MemoryStore::new()), config)
    }

    fn app(room: &str) -> Application {
        Application::new("Alice", "E1", "c1", room, 2)
    }

    fn occupied(mgr: &AllocationManager<MemoryStore>, room: &str) -> u32 {
        mgr.room(&RoomNumber::new(room)).map(|r| r.occupied).unwrap()
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(None)
        }

        fn write(&self, _data: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::WriteFailed(std::io::Error::other("disk full")))
        }
    }

    // =====================================================================
    // submit_request()
    // =====================================================================

    #[test]
    fn test_submit_request_valid_creates_pending_without_occupancy_change() {
        let mut mgr = manager();

        let request = mgr.submit_request(app("101")).expect("should succeed");

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.occupant_count, 1);
        assert_eq!(request.roommate_count, 2);
        assert_eq!(occupied(&mgr, "101"), 0);
        assert_eq!(mgr.request(&request.id), Some(&request));
    }

    #[test]
    fn test_submit_request_stores_trimmed_fields() {
        let mut mgr = manager();

        let request = mgr
            .submit_request(Application::new(" Bo ", " E9", "bo@x ", " 102 ", 1))
            .unwrap();

        assert_eq!(request.applicant_name, "Bo");
        assert_eq!(request.enrollment_id, "E9");
        assert_eq!(request.contact, "bo@x");
        assert_eq!(request.room_number.as_str(), "102");
    }

    #[test]
    fn test_submit_request_full_room_returns_room_full_and_keeps_state() {
        let mut mgr = manager();
        let before = mgr.state().clone();

        let result = mgr.submit_request(app("105"));

        assert!(
            matches!(&result, Err(AllocationError::RoomFull(n)) if n.as_str() == "105"),
            "got {result:?}"
        );
        assert_eq!(mgr.state(), &before);
    }

    #[test]
    fn test_submit_request_unknown_room_returns_room_not_found() {
        let mut mgr = manager();
        let result = mgr.submit_request(app("999"));
        assert!(matches!(result, Err(AllocationError::RoomNotFound(_))));
        assert!(mgr.list_requests().is_empty());
    }

    #[test]
    fn test_submit_request_blank_contact_returns_validation() {
        let mut mgr = manager();
        let result = mgr.submit_request(Application::new("Alice", "E1", "  ", "101", 1));
        assert!(matches!(result, Err(AllocationError::Validation(_))));
    }

    #[test]
    fn test_submit_request_validation_checked_before_room() {
        // A blank name on an unknown room is a validation error first.
        let mut mgr = manager();
        let result = mgr.submit_request(Application::new("", "E1", "c1", "999", 1));
        assert!(matches!(result, Err(AllocationError::Validation(_))));
    }

    #[test]
    fn test_submit_request_zero_occupants_config_returns_validation() {
        let mut mgr = manager_with(AllocationConfig {
            occupants_per_request: 0,
            ..AllocationConfig::default()
        });
        assert!(matches!(
            mgr.submit_request(app("101")),
            Err(AllocationError::Validation(_))
        ));
    }

    #[test]
    fn test_submit_request_multi_slot_needs_enough_free() {
        // Room 104 has 2 free slots; a 3-slot request doesn't fit.
        let mut mgr = manager_with(AllocationConfig {
            occupants_per_request: 3,
            ..AllocationConfig::default()
        });
        assert!(matches!(
            mgr.submit_request(app("104")),
            Err(AllocationError::RoomFull(_))
        ));
        assert!(mgr.submit_request(app("103")).is_ok());
    }

    #[test]
    fn test_submit_request_persists_state() {
        let store = MemoryStore::new();
        let mut mgr =
            AllocationManager::open(Persistence::new(store.clone()), AllocationConfig::default());

        let request = mgr.submit_request(app("101")).unwrap();

        let saved = store.contents().expect("state should be written");
        let saved: AllocationState = serde_json::from_slice(&saved).unwrap();
        assert_eq!(saved.requests, vec![request]);
    }

    #[test]
    fn test_submit_request_save_failure_is_not_surfaced() {
        let mut mgr =
            AllocationManager::open(Persistence::new(BrokenStore), AllocationConfig::default());

        let result = mgr.submit_request(app("101"));

        assert!(result.is_ok(), "save failures are logged, not returned");
        assert_eq!(mgr.list_requests().len(), 1);
    }

    // =====================================================================
    // approve_request()
    // =====================================================================

    #[test]
    fn test_approve_request_pending_increments_occupancy() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();

        mgr.approve_request(&request.id).expect("should succeed");

        assert_eq!(occupied(&mgr, "101"), 1);
        assert_eq!(mgr.request(&request.id).unwrap().status, RequestStatus::Approved);
    }

    #[test]
    fn test_approve_request_twice_returns_invariant_violation() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.approve_request(&request.id).unwrap();

        let result = mgr.approve_request(&request.id);

        assert!(matches!(
            result,
            Err(AllocationError::InvariantViolation { status: RequestStatus::Approved, .. })
        ));
        assert_eq!(occupied(&mgr, "101"), 1, "must not double-increment");
    }

    #[test]
    fn test_approve_request_unknown_id_returns_not_found() {
        let mut mgr = manager();
        let result = mgr.approve_request(&RequestId::new("nope"));
        assert!(matches!(result, Err(AllocationError::RequestNotFound(_))));
    }

    #[test]
    fn test_approve_request_rejected_returns_invariant_violation() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.reject_request(&request.id).unwrap();

        assert!(matches!(
            mgr.approve_request(&request.id),
            Err(AllocationError::InvariantViolation { .. })
        ));
        assert_eq!(occupied(&mgr, "101"), 0);
    }

    #[test]
    fn test_approve_request_after_room_filled_returns_room_full() {
        // Room 104 has 2 free slots. Three pending requests fit at
        // submission time; the third approval finds no slot left.
        let mut mgr = manager();
        let a = mgr.submit_request(app("104")).unwrap();
        let b = mgr.submit_request(app("104")).unwrap();
        let c = mgr.submit_request(app("104")).unwrap();

        mgr.approve_request(&a.id).unwrap();
        mgr.approve_request(&b.id).unwrap();
        let result = mgr.approve_request(&c.id);

        assert!(matches!(result, Err(AllocationError::RoomFull(_))));
        assert_eq!(occupied(&mgr, "104"), 3);
        assert_eq!(mgr.request(&c.id).unwrap().status, RequestStatus::Pending);
    }

    #[test]
    fn test_approve_request_missing_room_returns_room_not_found() {
        // Stored data can reference a room that no longer exists.
        let mut state = AllocationState::seeded();
        state.requests.push(Request {
            id: RequestId::new("orphan"),
            applicant_name: "Alice".into(),
            enrollment_id: "E1".into(),
            contact: "c1".into(),
            room_number: RoomNumber::new("999"),
            occupant_count: 1,
            roommate_count: 1,
            status: RequestStatus::Pending,
            submitted_at: 0,
        });
        let store = MemoryStore::with_contents(serde_json::to_vec(&state).unwrap());
        let mut mgr = AllocationManager::open(Persistence::new(store), AllocationConfig::default());

        let result = mgr.approve_request(&RequestId::new("orphan"));

        assert!(matches!(result, Err(AllocationError::RoomNotFound(_))));
        assert_eq!(mgr.state(), &state);
    }

    // =====================================================================
    // reject_request()
    // =====================================================================

    #[test]
    fn test_reject_request_pending_sets_rejected() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();

        mgr.reject_request(&request.id).unwrap();

        assert_eq!(mgr.request(&request.id).unwrap().status, RequestStatus::Rejected);
        assert_eq!(occupied(&mgr, "101"), 0);
    }

    #[test]
    fn test_reject_request_unknown_id_returns_not_found() {
        let mut mgr = manager();
        assert!(matches!(
            mgr.reject_request(&RequestId::new("nope")),
            Err(AllocationError::RequestNotFound(_))
        ));
    }

    #[test]
    fn test_reject_request_guarded_after_approve_returns_invariant_violation() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.approve_request(&request.id).unwrap();

        let result = mgr.reject_request(&request.id);

        assert!(matches!(result, Err(AllocationError::InvariantViolation { .. })));
        assert_eq!(mgr.request(&request.id).unwrap().status, RequestStatus::Approved);
    }

    #[test]
    fn test_reject_request_guarded_twice_returns_invariant_violation() {
        let mut mgr = manager();
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.reject_request(&request.id).unwrap();

        assert!(matches!(
            mgr.reject_request(&request.id),
            Err(AllocationError::InvariantViolation { status: RequestStatus::Rejected, .. })
        ));
    }

    #[test]
    fn test_reject_request_overwrite_after_approve_keeps_slots_consumed() {
        let mut mgr = manager_with(AllocationConfig {
            reject_policy: RejectPolicy::Overwrite,
            ..AllocationConfig::default()
        });
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.approve_request(&request.id).unwrap();

        mgr.reject_request(&request.id).expect("overwrite policy accepts");

        assert_eq!(mgr.request(&request.id).unwrap().status, RequestStatus::Rejected);
        assert_eq!(occupied(&mgr, "101"), 1, "no slot reversal");
    }

    #[test]
    fn test_reject_request_overwrite_twice_succeeds() {
        let mut mgr = manager_with(AllocationConfig {
            reject_policy: RejectPolicy::Overwrite,
            ..AllocationConfig::default()
        });
        let request = mgr.submit_request(app("101")).unwrap();
        mgr.reject_request(&request.id).unwrap();
        assert!(mgr.reject_request(&request.id).is_ok());
    }

    // =====================================================================
    // Queries
    // =====================================================================

    #[test]
    fn test_list_available_rooms_seed_excludes_full_room() {
        let mgr = manager();

        let numbers: Vec<String> = mgr
            .list_available_rooms()
            .into_iter()
            .map(|a| a.room.number.0)
            .collect();

        assert_eq!(numbers, vec!["101", "102", "103", "104", "106", "107"]);
    }

    #[test]
    fn test_list_all_rooms_reports_free_slots_in_order() {
        let mgr = manager();
        let free: Vec<u32> = mgr.list_all_rooms().iter().map(|a| a.free_slots).collect();
        assert_eq!(free, vec![2, 2, 3, 2, 0, 3, 2]);
    }

    #[test]
    fn test_list_requests_most_recent_first() {
        let mut mgr = manager();
        let first = mgr.submit_request(app("101")).unwrap();
        let second = mgr.submit_request(app("102")).unwrap();

        let ids: Vec<&RequestId> = mgr.list_requests().into_iter().map(|r| &r.id).collect();

        assert_eq!(ids, vec![&second.id, &first.id]);
    }

    #[test]
    fn test_pending_requests_oldest_first_excludes_decided() {
        let mut mgr = manager();
        let a = mgr.submit_request(app("101")).unwrap();
        let b = mgr.submit_request(app("102")).unwrap();
        let c = mgr.submit_request(app("103")).unwrap();
        mgr.approve_request(&b.id).unwrap();

        let ids: Vec<&RequestId> = mgr.pending_requests().into_iter().map(|r| &r.id).collect();

        assert_eq!(ids, vec![&a.id, &c.id]);
    }

    #[test]
    fn test_queries_on_empty_request_list() {
        let mgr = manager();
        assert!(mgr.list_requests().is_empty());
        assert!(mgr.pending_requests().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut mgr = manager();
        let a = mgr.submit_request(app("101")).unwrap();
        let b = mgr.submit_request(app("102")).unwrap();
        mgr.submit_request(app("103")).unwrap();
        mgr.approve_request(&a.id).unwrap();
        mgr.reject_request(&b.id).unwrap();

        let summary = mgr.summary();

        assert_eq!(summary.rooms, 7);
        assert_eq!(summary.total_capacity, 17);
        assert_eq!(summary.total_occupied, 4);
        assert_eq!(summary.total_free, 13);
        assert_eq!((summary.pending, summary.approved, summary.rejected), (1, 1, 1));
    }

    #[test]
    fn test_summary_huge_restored_capacities_do_not_overflow() {
        let state = AllocationState {
            rooms: vec![Room::new("A", u32::MAX, 0), Room::new("B", u32::MAX, u32::MAX)],
            requests: vec![],
        };
        let store = MemoryStore::with_contents(serde_json::to_vec(&state).unwrap());
        let mgr = AllocationManager::open(Persistence::new(store), AllocationConfig::default());
        assert_eq!(mgr.state(), &state);

        let summary = mgr.summary();

        assert_eq!(summary.total_capacity, 2 * u64::from(u32::MAX));
        assert_eq!(summary.total_occupied, u64::from(u32::MAX));
        assert_eq!(summary.total_free, u64::from(u32::MAX));
    }
}
