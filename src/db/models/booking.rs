//! Booking Model
//!
//! 预订实体：按小时计的限时入住 (3/8/12/24h)，状态机见 `bookings` 模块。

use super::guest::IdType;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Allowed stay durations in hours
pub const ALLOWED_DURATIONS: [u8; 4] = [3, 8, 12, 24];

/// Booking lifecycle status — the state machine's state variable
///
/// `CheckedOut`, `Cancelled` and `NoShow` are terminal for normal flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

/// Derived payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

/// Booking entity
///
/// Temporal fields are Unix millis. `check_out_date` is fixed at creation
/// (`check_in_date + duration`) and is never recomputed afterwards —
/// `actual_check_in` may drift from the planned time without altering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Display label `BK-YYYYMMDD-NNN`; not guaranteed globally unique
    pub booking_number: String,

    // Guest snapshot, captured at creation and independent of the directory
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub id_type: IdType,
    pub id_number: String,

    /// Room reference
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,

    pub check_in_date: i64,
    pub check_out_date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_check_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_check_out: Option<i64>,
    /// Stay length in hours, one of {3, 8, 12, 24}
    pub duration: u8,

    pub total_amount: f64,
    pub paid_amount: f64,
    /// Derived: `total_amount - paid_amount`
    pub balance: f64,
    /// Derived from paid vs total
    pub payment_status: PaymentStatus,

    pub booking_status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<i64>,

    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,

    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub id_type: IdType,
    #[validate(length(min = 1, message = "id number is required"))]
    pub id_number: String,

    pub check_in_date: i64,
    pub duration: u8,

    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,

    /// Initial status; defaults to Confirmed. Only Confirmed and CheckedIn
    /// are accepted (walk-ins check in at creation time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<BookingStatus>,

    #[validate(length(min = 1, message = "created_by is required"))]
    pub created_by: String,
}

/// Generic field-patch payload
///
/// A patch never triggers state-machine side effects: `booking_status` and
/// `room` are present only so the engine can reject them with a pointer to
/// the dedicated operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<IdType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<f64>,

    // Rejected by the engine; see bookings::command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<BookingStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub room: Option<RecordId>,
}

/// Cancel request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// No-show request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoShowRequest {
    pub notes: Option<String>,
}
