//! Database Models
//!
//! SurrealDB document models. 全栈统一使用 "table:id" 格式的 RecordId，
//! 时间字段一律为 `i64` Unix millis。

pub mod booking;
pub mod guest;
pub mod report;
pub mod room;
pub mod room_type;
pub mod serde_helpers;

pub use booking::{
    ALLOWED_DURATIONS, Booking, BookingCreate, BookingStatus, BookingUpdate, CancelRequest,
    NoShowRequest, PaymentStatus,
};
pub use guest::{Guest, GuestUpdate, IdType};
pub use report::{DashboardReport, RevenueDay, RoomStatusCount};
pub use room::{Room, RoomCreate, RoomStatus, RoomStatusUpdate, RoomUpdate};
pub use room_type::{Pricing, RoomType, RoomTypeCreate, RoomTypeUpdate};
