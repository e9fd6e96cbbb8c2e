//! Booking commands
//!
//! Tagged command variants are the only paths that run transition guards
//! and synchronization side effects. A generic field patch
//! ([`BookingCommand::PatchFields`]) never implicitly triggers them — a
//! patch carrying `booking_status` or `room` is rejected by the engine.

use crate::db::models::{BookingCreate, BookingUpdate};

/// A unit of work for the [`BookingEngine`](super::BookingEngine)
#[derive(Debug, Clone)]
pub enum BookingCommand {
    /// Create a booking (Confirmed by default, CheckedIn for walk-ins)
    Create(Box<BookingCreate>),
    /// Confirmed → CheckedIn; stamps `actual_check_in` once
    CheckIn { id: String },
    /// CheckedIn → CheckedOut; room goes to turnover (Maintenance)
    CheckOut { id: String },
    /// → Cancelled; room released
    Cancel { id: String, reason: Option<String> },
    /// Confirmed → NoShow; room released, guest record annotated
    MarkNoShow { id: String, notes: Option<String> },
    /// Generic field patch; runs no transition
    PatchFields {
        id: String,
        patch: Box<BookingUpdate>,
    },
}
