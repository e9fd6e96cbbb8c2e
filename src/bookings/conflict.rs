//! Room-availability conflict detection
//!
//! A room is bookable for a window iff no *other* Confirmed/CheckedIn
//! booking on it overlaps that window, and the room itself is Available.
//! The scan and the subsequent insert must run under the engine's per-room
//! lock; this module only decides, it never writes.

use super::error::BookingError;
use crate::db::models::{Room, RoomStatus};
use crate::db::repository::{BookingRepository, RoomRepository};
use surrealdb::RecordId;

/// Inclusive-boundary overlap test
///
/// `existing.check_in <= new.check_out AND existing.check_out >= new.check_in`.
/// Back-to-back bookings that share an exact boundary instant ARE treated
/// as conflicting — on exact-second boundaries this errs toward blocking
/// rather than double-booking.
pub fn overlaps_inclusive(
    existing_in: i64,
    existing_out: i64,
    new_in: i64,
    new_out: i64,
) -> bool {
    existing_in <= new_out && existing_out >= new_in
}

/// Resolve the room and verify it can take a booking over the window
///
/// Checks, in order: the room exists, it is active and Available (belt and
/// suspenders — the status should already reflect active bookings), and no
/// overlapping active booking exists. `exclude` skips the booking being
/// edited when re-validating a date change.
pub async fn assert_room_bookable(
    rooms: &RoomRepository,
    bookings: &BookingRepository,
    room_id: &RecordId,
    new_check_in: i64,
    new_check_out: i64,
    exclude: Option<&RecordId>,
) -> Result<Room, BookingError> {
    let room = rooms
        .find_by_id(&room_id.to_string())
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Room {} not found", room_id)))?;

    if !room.is_active || room.status != RoomStatus::Available {
        return Err(BookingError::RoomUnavailable(
            "Room is not available".to_string(),
        ));
    }

    let conflicts = bookings
        .find_conflicts(room_id, new_check_in, new_check_out, exclude)
        .await?;
    if !conflicts.is_empty() {
        return Err(BookingError::RoomUnavailable(
            "Room is already booked for the selected dates".to_string(),
        ));
    }

    Ok(room)
}

/// Re-validate only the date window (room status irrelevant: the booking
/// being edited already holds the room)
pub async fn assert_window_free(
    bookings: &BookingRepository,
    room_id: &RecordId,
    new_check_in: i64,
    new_check_out: i64,
    exclude: &RecordId,
) -> Result<(), BookingError> {
    let conflicts = bookings
        .find_conflicts(room_id, new_check_in, new_check_out, Some(exclude))
        .await?;
    if !conflicts.is_empty() {
        return Err(BookingError::RoomUnavailable(
            "Room is already booked for the selected dates".to_string(),
        ));
    }
    Ok(())
}
