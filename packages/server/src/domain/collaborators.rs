//! External collaborator interfaces the session engine consumes.
//!
//! User registration, durable room metadata, and chat history are CRUD
//! plumbing outside the engine; the engine depends only on these traits.

use async_trait::async_trait;

use super::entity::ChatMessage;
use super::error::{DirectoryError, IdentityError};
use super::value_object::{RoomId, Timestamp};

/// A verified identity: opaque durable id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

/// Verifies a credential token into an identity.
///
/// The engine is lenient: a join without a usable identity falls back to an
/// anonymous display name instead of being rejected.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credential_token: &str) -> Result<Identity, IdentityError>;
}

/// Durable room metadata for discovery screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMeta {
    pub id: RoomId,
    pub name: String,
    pub owner_id: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
}

/// Listing entry returned by [`RoomDirectory::list_public_rooms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub created_at: Timestamp,
}

/// New-room input for [`RoomDirectory::create_room_record`].
#[derive(Debug, Clone)]
pub struct NewRoomMeta {
    pub name: String,
    pub owner_id: Option<String>,
    pub is_public: bool,
}

/// Durable store of room metadata. The session engine's [`RoomId`] matches
/// the directory's identifier, so a durable room and its live session refer
/// to the same entity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn list_public_rooms(&self) -> Vec<RoomSummary>;

    async fn create_room_record(&self, meta: NewRoomMeta) -> RoomId;

    async fn get_room_record(&self, room_id: &RoomId) -> Result<RoomMeta, DirectoryError>;
}

/// Optional chat history sink. Best-effort: append never blocks or fails the
/// live broadcast.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatArchive: Send + Sync {
    async fn append(&self, message: ChatMessage);
}
