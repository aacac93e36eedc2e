use roomwise::logging;
use roomwise::prelude::*;

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

/// What the walkthrough did, for the final log line and the tests.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    full_room_refused: bool,
    approved: RequestId,
    rejected: RequestId,
    summary: AllocationSummary,
}

/// Runs a short front-desk session: one refused application, one
/// approval, one rejection.
fn walkthrough(desk: &mut AllocationDesk) -> Result<Outcome, RoomwiseError> {
    let available: Vec<String> = desk
        .list_available_rooms()
        .iter()
        .map(|a| format!("{} ({} free)", a.room.number, a.free_slots))
        .collect();
    tracing::info!(rooms = ?available, "available rooms");

    let full_room_refused = match desk.submit_request(Application::new(
        "Zed",
        "E0",
        "zed@example.com",
        "105",
        1,
    )) {
        Err(AllocationError::RoomFull(room)) => {
            tracing::info!(%room, "application refused: room full");
            true
        }
        Err(e) => return Err(e.into()),
        Ok(_) => false,
    };

    let alice = desk.submit_request(Application::new(
        "Alice",
        "E1",
        "alice@example.com",
        "101",
        2,
    ))?;
    let bo = desk.submit_request(Application::new("Bo", "E2", "bo@example.com", "103", 1))?;

    for request in desk.pending_requests() {
        tracing::info!(
            id = %request.id,
            applicant = %request.applicant_name,
            room = %request.room_number,
            "pending"
        );
    }

    desk.approve_request(&alice.id)?;
    desk.reject_request(&bo.id)?;

    Ok(Outcome {
        full_room_refused,
        approved: alice.id,
        rejected: bo.id,
        summary: desk.summary(),
    })
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn main() -> Result<(), RoomwiseError> {
    logging::init()?;

    let config = DeskConfig::from_env();
    let mut desk = AllocationDeskBuilder::from_config(config).build()?;
    if let Some(diagnostic) = desk.persistence().last_diagnostic() {
        tracing::info!(?diagnostic, "started from seed");
    }

    let outcome = walkthrough(&mut desk)?;
    tracing::info!(summary = ?outcome.summary, "walkthrough finished");
    Ok(())
}
