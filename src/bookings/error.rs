//! Booking engine error taxonomy
//!
//! Business-rule violations are detected synchronously and returned
//! immediately; none are queued, deferred or swallowed. Every failure
//! carries a human-readable message distinguishing its cause.

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Booking/room/guest id does not resolve (404)
    #[error("{0}")]
    NotFound(String),

    /// Missing/malformed input, non-positive amount, bad duration (400)
    #[error("{0}")]
    Validation(String),

    /// Date conflict or room not Available at creation (400, business rule)
    #[error("{0}")]
    RoomUnavailable(String),

    /// State machine guard failed (400, business rule)
    #[error("{0}")]
    InvalidTransition(String),

    /// Persistence fault (500); detail logged, not exposed
    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for BookingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => BookingError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Validation(msg) => {
                BookingError::Validation(msg)
            }
            RepoError::Database(msg) => BookingError::Database(msg),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(msg) => AppError::NotFound(msg),
            BookingError::Validation(msg) => AppError::Validation(msg),
            BookingError::RoomUnavailable(msg) | BookingError::InvalidTransition(msg) => {
                AppError::BusinessRule(msg)
            }
            BookingError::Database(msg) => AppError::Database(msg),
        }
    }
}
