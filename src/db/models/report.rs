//! Report read models
//!
//! 只读聚合结果，无自身业务不变量。

use serde::{Deserialize, Serialize};

/// Count of rooms per status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStatusCount {
    pub status: String,
    pub total: i64,
}

/// Front-desk dashboard aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub rooms_by_status: Vec<RoomStatusCount>,
    /// Confirmed bookings whose planned check-in falls today
    pub arrivals_today: i64,
    /// Checked-in bookings whose planned check-out falls today
    pub departures_today: i64,
    /// Currently checked-in bookings
    pub in_house: i64,
    /// Sum of paid amounts over bookings created today
    pub revenue_today: f64,
}

/// Paid totals for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueDay {
    pub date: String,
    pub revenue: f64,
    pub bookings: i64,
}
