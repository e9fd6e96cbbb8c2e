//! Guest Model
//!
//! 客史档案。按 (first_name, last_name, id_number) 查重后插入，
//! `notes` 为追加式事件记录（如 No-show）。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Identity document type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdType {
    Passport,
    DriverLicense,
    NationalId,
    Other,
}

/// Guest entity (客史)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub id_type: IdType,
    pub id_number: String,
    /// Append-only incident log (no-shows etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Update guest payload
///
/// `note` is appended to the existing `notes` log, never replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
