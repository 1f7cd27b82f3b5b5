//! Room state store trait.
//!
//! The store is the single source of truth for playback position between
//! events. Implementations must make each operation atomic with respect to
//! other operations on the same room (per-room mutual exclusion); operations
//! on distinct rooms may proceed in parallel.
//!
//! Mutating operations take a *relay hook* that the implementation invokes
//! while the room's mutual exclusion is still held. Callers enqueue outbound
//! messages there (the pusher enqueue is non-blocking), which pins delivery
//! order to application order: two commands applied in some order are
//! enqueued to every recipient in that same order, and the membership the
//! hook observes is the room's membership at enqueue time, so a participant
//! who already left never receives a stray message.

use async_trait::async_trait;

use super::entity::{Participant, PlayerCommand, PlayerState, Room};
use super::error::StoreError;
use super::value_object::{ConnectionId, RoomId};

/// Hook run under the room's lock; receives the room as it stands
/// immediately after the operation.
pub type RoomRelay<'a> = &'a mut (dyn FnMut(&Room) + Send);

/// Hook for removals; also receives the participant that was removed.
pub type RemovalRelay<'a> = &'a mut (dyn FnMut(&Room, &Participant) + Send);

/// In-memory table of active rooms.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Fetch a room, creating it with the default player state if absent.
    /// Returns a snapshot of the room after the call.
    async fn get_or_create(&self, room_id: &RoomId) -> Room;

    /// Snapshot of a room, if it exists.
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// Insert a participant. Fails with [`StoreError::AlreadyJoined`] if the
    /// connection is already present; clears the eviction countdown on
    /// success. `on_joined` runs under the room lock with the post-insert
    /// room. Returns a snapshot of the room after insertion.
    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
        on_joined: RoomRelay<'_>,
    ) -> Result<Room, StoreError>;

    /// Remove a participant. If this empties the room, the eviction countdown
    /// starts. `on_removed` runs under the room lock, only when the
    /// connection actually was a member. Returns the room snapshot after
    /// removal and the removed participant (None if not a member).
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        on_removed: RemovalRelay<'_>,
    ) -> Result<(Room, Option<Participant>), StoreError>;

    /// Apply a playback command atomically and return the resulting state.
    /// `on_applied` runs under the room lock with the post-apply room.
    async fn update_player_state(
        &self,
        room_id: &RoomId,
        command: PlayerCommand,
        on_applied: RoomRelay<'_>,
    ) -> Result<PlayerState, StoreError>;

    /// Run a relay hook against the room without mutating it, still under
    /// the room lock. Used for events that carry no state transition (chat)
    /// but must not be reordered against ones that do.
    async fn relay_to_room(&self, room_id: &RoomId, relay: RoomRelay<'_>)
    -> Result<(), StoreError>;

    /// Display names of current participants, in insertion order of join.
    async fn list_participant_names(&self, room_id: &RoomId) -> Result<Vec<String>, StoreError>;

    /// Live connection set of a room, resolved at call time. Empty if the
    /// room does not exist.
    async fn participant_connections(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Number of participants currently in the room (0 if absent).
    async fn occupancy(&self, room_id: &RoomId) -> usize;

    /// Evict every room whose eviction countdown has passed the grace
    /// period. Returns the ids of the evicted rooms.
    async fn reap_expired(&self) -> Vec<RoomId>;
}
