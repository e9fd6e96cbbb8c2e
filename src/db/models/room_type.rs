//! Room Type Model
//!
//! 房型与时段价格表。价格按 duration 直接查表，不做服务端重算。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Price table keyed by stay duration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    pub hourly3: f64,
    pub hourly8: f64,
    pub hourly12: f64,
    pub daily: f64,
}

impl Pricing {
    /// Direct key lookup: 3→hourly3, 8→hourly8, 12→hourly12, 24→daily
    pub fn rate_for(&self, duration: u8) -> Option<f64> {
        match duration {
            3 => Some(self.hourly3),
            8 => Some(self.hourly8),
            12 => Some(self.hourly12),
            24 => Some(self.daily),
            _ => None,
        }
    }
}

/// Room type entity (房型)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub base_capacity: i32,
    pub pricing: Pricing,
    /// Late-checkout / no-show penalty amount
    #[serde(default)]
    pub penalty: f64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create room type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeCreate {
    pub name: String,
    pub base_capacity: Option<i32>,
    pub pricing: Pricing,
    pub penalty: Option<f64>,
}

/// Update room type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_lookup_by_duration() {
        let pricing = Pricing {
            hourly3: 50.0,
            hourly8: 90.0,
            hourly12: 120.0,
            daily: 180.0,
        };
        assert_eq!(pricing.rate_for(3), Some(50.0));
        assert_eq!(pricing.rate_for(8), Some(90.0));
        assert_eq!(pricing.rate_for(12), Some(120.0));
        assert_eq!(pricing.rate_for(24), Some(180.0));
        assert_eq!(pricing.rate_for(6), None);
    }
}
