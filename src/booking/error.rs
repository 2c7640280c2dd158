//! Error types for booking requests

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Booking service unavailable: {0}")]
    Unavailable(String),

    #[error("Booking cancelled before it completed")]
    Cancelled,
}

pub type BookingResult<T> = Result<T, BookingError>;
