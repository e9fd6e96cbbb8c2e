//! Booking Engine Module
//!
//! This module owns the booking lifecycle:
//!
//! - **command**: tagged command variants — the only paths that run
//!   state-machine guards and side effects
//! - **conflict**: room-availability conflict detection
//! - **transitions**: status state machine guards and the room-status mapping
//! - **derive**: pure derived-field computation (balance, payment status,
//!   booking number, checkout time)
//! - **engine**: `BookingEngine`, the single command-processing authority
//!
//! # Architecture
//!
//! ```text
//! BookingCommand → BookingEngine ──┬→ conflict scan (per-room lock held)
//!                                  ├→ transition guards
//!                                  ├→ booking write
//!                                  └→ room status / guest directory sync
//! ```
//!
//! All status-affecting work for one room serializes on a per-room async
//! lock held from before the conflict scan until after the write commits,
//! so two concurrent creations can never both pass the availability check.

pub mod command;
pub mod conflict;
pub mod derive;
pub mod engine;
pub mod error;
pub mod transitions;

pub use command::BookingCommand;
pub use engine::BookingEngine;
pub use error::BookingError;
