//! Domain layer: value objects, entities, and the trait seams the session
//! engine depends on.
//!
//! The domain defines the interfaces it needs (store, pusher, external
//! collaborators); the infrastructure layer provides the implementations.

pub mod collaborators;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod store;
pub mod value_object;

pub use collaborators::{
    ChatArchive, Identity, IdentityProvider, NewRoomMeta, RoomDirectory, RoomMeta, RoomSummary,
};
pub use entity::{ChatMessage, Participant, PlayerCommand, PlayerState, Room};
pub use error::{DirectoryError, IdentityError, PushError, StoreError};
pub use pusher::{MessagePusher, PusherChannel};
pub use store::{RemovalRelay, RoomRelay, RoomStore};
pub use value_object::{
    ConnectionId, DisplayName, MediaRef, MessageContent, PositionSeconds, RoomId, RoomIdFactory,
    Timestamp, ValidationError,
};
