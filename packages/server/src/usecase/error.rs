//! Error types for the session use cases.

use thiserror::Error;

use crate::domain::ValidationError;

/// Failure of a session operation, reported back to the issuing client only.
///
/// A connection that was never in a room and one whose room has been evicted
/// are indistinguishable to the caller; both surface as [`NotInRoom`].
///
/// [`NotInRoom`]: SessionError::NotInRoom
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("connection is not in a room")]
    NotInRoom,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<ValidationError> for SessionError {
    fn from(e: ValidationError) -> Self {
        SessionError::InvalidPayload(e.to_string())
    }
}

/// Failure of a room directory lookup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
    #[error("room not found")]
    NotFound,
}
