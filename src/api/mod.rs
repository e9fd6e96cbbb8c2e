//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`rooms`] - 客房管理接口
//! - [`room_types`] - 房型与价格表接口
//! - [`guests`] - 客史管理接口
//! - [`bookings`] - 预订管理接口（含五个状态操作）
//! - [`reports`] - 只读报表接口

pub mod health;

// Data models API
pub mod bookings;
pub mod guests;
pub mod reports;
pub mod room_types;
pub mod rooms;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
