//! Room Model
//!
//! 客房实体：房态由预订事件驱动，也可由授权操作直接设置

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Room operational status
///
/// Derived from booking events; `Maintenance` → `Available` requires an
/// explicit operator action (turnover after checkout).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    OutOfOrder,
}

/// Room entity (客房)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub room_number: String,
    /// Room type reference
    #[serde(with = "serde_helpers::record_id")]
    pub room_type: RecordId,
    #[serde(default)]
    pub floor: i32,
    pub status: RoomStatus,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    pub room_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub room_type: RecordId,
    pub floor: Option<i32>,
}

/// Update room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub room_type: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Status change payload (staff route and admin override)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStatusUpdate {
    pub status: RoomStatus,
}
