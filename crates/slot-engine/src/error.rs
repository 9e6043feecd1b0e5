//! Error types for slot-engine operations.
//!
//! The finder itself is total; these errors come from validating what the
//! caller hands it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid working window: {0}")]
    InvalidWindow(String),

    #[error("Invalid busy interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid calendar event: {0}")]
    InvalidEvent(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for SlotError {
    fn from(e: serde_json::Error) -> Self {
        SlotError::InvalidRequest(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
