//! Error types for the domain's trait seams.

use thiserror::Error;

/// Errors from the room state store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The connection is already a participant of the room.
    #[error("connection already joined this room")]
    AlreadyJoined,
    /// The room id is not (or no longer) in the store.
    #[error("room not found")]
    RoomNotFound,
}

/// Errors from the broadcast dispatcher.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Errors from the durable room directory.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectoryError {
    #[error("room record not found")]
    NotFound,
}

/// Errors from the identity provider.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("credential token could not be verified")]
    Unauthenticated,
}
