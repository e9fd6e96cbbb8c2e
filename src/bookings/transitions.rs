//! Booking status state machine
//!
//! Pure guard checks plus the room-status mapping. Guard failures reject
//! the operation; booking and room remain unchanged.

use super::error::BookingError;
use crate::db::models::{BookingStatus, RoomStatus};

/// Room status implied by a booking status change
///
/// Confirmed occupies the room immediately — a confirmed booking holds the
/// room from creation, not from check-in. Checkout parks the room in
/// Maintenance for turnover; cycling back to Available is an explicit
/// operator action.
pub fn room_status_for(status: BookingStatus) -> RoomStatus {
    match status {
        BookingStatus::Confirmed | BookingStatus::CheckedIn => RoomStatus::Occupied,
        BookingStatus::CheckedOut => RoomStatus::Maintenance,
        BookingStatus::Cancelled | BookingStatus::NoShow => RoomStatus::Available,
    }
}

/// Check-in is only valid from Confirmed
pub fn guard_check_in(current: BookingStatus) -> Result<(), BookingError> {
    match current {
        BookingStatus::Confirmed => Ok(()),
        _ => Err(BookingError::InvalidTransition(
            "Booking must be confirmed to check in".to_string(),
        )),
    }
}

/// Check-out is only valid from CheckedIn
pub fn guard_check_out(current: BookingStatus) -> Result<(), BookingError> {
    match current {
        BookingStatus::CheckedIn => Ok(()),
        _ => Err(BookingError::InvalidTransition(
            "Booking must be checked in to check out".to_string(),
        )),
    }
}

/// Cancel is rejected once checked out or already cancelled
pub fn guard_cancel(current: BookingStatus) -> Result<(), BookingError> {
    match current {
        BookingStatus::CheckedOut => Err(BookingError::InvalidTransition(
            "Booking is already checked out".to_string(),
        )),
        BookingStatus::Cancelled => Err(BookingError::InvalidTransition(
            "Booking is already cancelled".to_string(),
        )),
        _ => Ok(()),
    }
}

/// No-show is rejected from CheckedIn, CheckedOut and Cancelled
pub fn guard_no_show(current: BookingStatus) -> Result<(), BookingError> {
    match current {
        BookingStatus::CheckedIn => Err(BookingError::InvalidTransition(
            "Cannot mark a checked-in booking as no-show".to_string(),
        )),
        BookingStatus::CheckedOut => Err(BookingError::InvalidTransition(
            "Booking is already checked out".to_string(),
        )),
        BookingStatus::Cancelled => Err(BookingError::InvalidTransition(
            "Booking is already cancelled".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Staff room-status rule: only Maintenance → Available is permitted
/// without the admin override (turnover completion).
pub fn guard_staff_room_status(
    current: RoomStatus,
    requested: RoomStatus,
) -> Result<(), BookingError> {
    if current == RoomStatus::Maintenance && requested == RoomStatus::Available {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition(
            "Only a maintenance room can be returned to available".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn room_status_mapping_is_total() {
        assert_eq!(room_status_for(Confirmed), RoomStatus::Occupied);
        assert_eq!(room_status_for(CheckedIn), RoomStatus::Occupied);
        assert_eq!(room_status_for(CheckedOut), RoomStatus::Maintenance);
        assert_eq!(room_status_for(Cancelled), RoomStatus::Available);
        assert_eq!(room_status_for(NoShow), RoomStatus::Available);
    }

    #[test]
    fn check_in_only_from_confirmed() {
        assert!(guard_check_in(Confirmed).is_ok());
        for status in [CheckedIn, CheckedOut, Cancelled, NoShow] {
            assert!(matches!(
                guard_check_in(status),
                Err(BookingError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn check_out_only_from_checked_in() {
        assert!(guard_check_out(CheckedIn).is_ok());
        for status in [Confirmed, CheckedOut, Cancelled, NoShow] {
            assert!(matches!(
                guard_check_out(status),
                Err(BookingError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn cancel_guard() {
        assert!(guard_cancel(Confirmed).is_ok());
        assert!(guard_cancel(CheckedIn).is_ok());
        assert!(guard_cancel(CheckedOut).is_err());
        assert!(guard_cancel(Cancelled).is_err());
    }

    #[test]
    fn no_show_guard() {
        assert!(guard_no_show(Confirmed).is_ok());
        for status in [CheckedIn, CheckedOut, Cancelled] {
            assert!(matches!(
                guard_no_show(status),
                Err(BookingError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn guard_messages_name_the_cause() {
        let err = guard_check_in(CheckedIn).unwrap_err();
        assert_eq!(err.to_string(), "Booking must be confirmed to check in");
        let err = guard_cancel(CheckedOut).unwrap_err();
        assert_eq!(err.to_string(), "Booking is already checked out");
    }

    #[test]
    fn staff_room_status_rule() {
        assert!(guard_staff_room_status(RoomStatus::Maintenance, RoomStatus::Available).is_ok());
        assert!(guard_staff_room_status(RoomStatus::Available, RoomStatus::Maintenance).is_err());
        assert!(guard_staff_room_status(RoomStatus::Occupied, RoomStatus::Available).is_err());
        assert!(guard_staff_room_status(RoomStatus::Maintenance, RoomStatus::OutOfOrder).is_err());
    }
}
