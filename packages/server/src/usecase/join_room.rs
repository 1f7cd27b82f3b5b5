//! UseCase: joining a room.
//!
//! Join is the entry point of the session protocol. It resolves the caller's
//! display identity, performs the implicit leave when the connection was
//! bound to a different room, and inserts the participant. The room is
//! created lazily on first join. The snapshot push and the user-joined
//! broadcast are enqueued inside the store's relay hook, so a playback event
//! applied right after the join can never reach the joiner ahead of its
//! snapshot.

use std::sync::Arc;

use watchparty_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisplayName, IdentityProvider, MessagePusher, Participant, PlayerState, Room,
    RoomId, RoomStore, StoreError, Timestamp,
};
use crate::infrastructure::ConnectionRegistry;
use crate::infrastructure::dto::websocket::{PlayerStateDto, ServerEvent};

use super::error::SessionError;

/// Record of a membership change announced to a room.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveNotice {
    pub room_id: RoomId,
    pub display_name: String,
    /// Remaining participant names, in join order.
    pub participants: Vec<String>,
    /// Remaining connections the user-left frame was enqueued to.
    pub notify_targets: Vec<ConnectionId>,
}

/// Result of a join: the snapshot handed to the joiner plus what was
/// announced on its behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub player_state: PlayerState,
    /// Participant names after the join, in join order.
    pub participants: Vec<String>,
    pub display_name: String,
    pub identity_id: Option<String>,
    /// False when the join was a duplicate of an existing membership; the
    /// caller still gets the snapshot but nothing is broadcast.
    pub joined_now: bool,
    /// Everyone in the room except the joiner.
    pub notify_targets: Vec<ConnectionId>,
    /// Set when the join implicitly removed the connection from another room.
    pub implicit_leave: Option<LeaveNotice>,
}

pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
    identity_provider: Arc<dyn IdentityProvider>,
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        identity_provider: Arc<dyn IdentityProvider>,
        registry: Arc<ConnectionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            identity_provider,
            registry,
            pusher,
            clock,
        }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: String,
        token: Option<String>,
        display_name: Option<String>,
    ) -> Result<JoinOutcome, SessionError> {
        let room_id = RoomId::new(room_id)?;

        let (display_name, identity_id) = self
            .resolve_identity(&connection_id, token, display_name)
            .await;

        // Rebinding to a different room owes the old room a leave first; the
        // old room hears it before the new room hears anything.
        let implicit_leave = match self.registry.bind_room(connection_id, room_id.clone()).await {
            Some(previous_room) => self.remove_from(&previous_room, &connection_id).await,
            None => None,
        };

        let participant = Participant::new(
            connection_id,
            display_name.clone(),
            identity_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );

        let joined_event = ServerEvent::UserJoined {
            display_name: display_name.as_str().to_string(),
            identity_id: identity_id.clone(),
        }
        .encode();

        let mut notify_targets = Vec::new();
        let result = self
            .store
            .add_participant(&room_id, participant, &mut |room: &Room| {
                // Snapshot first: anything applied to the room after this
                // hook lands behind it in the joiner's channel.
                self.push_snapshot(&connection_id, room);
                let targets: Vec<ConnectionId> = room
                    .connection_ids()
                    .into_iter()
                    .filter(|id| *id != connection_id)
                    .collect();
                if let Some(json) = &joined_event {
                    self.pusher.broadcast(&targets, json);
                }
                notify_targets = targets;
            })
            .await;

        let (room, joined_now) = match result {
            Ok(room) => (room, true),
            // Duplicate join is idempotent: re-send the snapshot, broadcast
            // nothing.
            Err(StoreError::AlreadyJoined) => {
                let mut existing = None;
                self.store
                    .relay_to_room(&room_id, &mut |room: &Room| {
                        self.push_snapshot(&connection_id, room);
                        existing = Some(room.clone());
                    })
                    .await
                    .map_err(|_| SessionError::NotInRoom)?;
                let room = existing.ok_or(SessionError::NotInRoom)?;
                (room, false)
            }
            // add_participant creates the room lazily, so the only remaining
            // error is a race with eviction; the store serializes creation
            // and eviction, which makes this arm unreachable in practice.
            Err(StoreError::RoomNotFound) => return Err(SessionError::NotInRoom),
        };

        if joined_now {
            tracing::info!(
                room_id = %room_id,
                display_name = %display_name,
                "participant joined"
            );
        }

        Ok(JoinOutcome {
            room_id,
            player_state: room.player_state.clone(),
            participants: room.participant_names(),
            display_name: display_name.into_string(),
            identity_id,
            joined_now,
            notify_targets,
            implicit_leave,
        })
    }

    /// Enqueue the authoritative room snapshot to a single connection.
    fn push_snapshot(&self, connection_id: &ConnectionId, room: &Room) {
        let snapshot = ServerEvent::RoomState {
            room_id: room.id.as_str().to_string(),
            player_state: PlayerStateDto::from(&room.player_state),
            participants: room.participant_names(),
        };
        if let Some(json) = snapshot.encode() {
            if let Err(e) = self.pusher.push_to(connection_id, &json) {
                tracing::warn!(connection_id = %connection_id, error = %e, "failed to send room snapshot");
            }
        }
    }

    /// Resolve the joiner's display identity.
    ///
    /// A verified token yields a durable identity; an invalid or absent token
    /// falls back to the requested display name, and failing that to an
    /// anonymous per-connection name. A join is never rejected over identity.
    async fn resolve_identity(
        &self,
        connection_id: &ConnectionId,
        token: Option<String>,
        display_name: Option<String>,
    ) -> (DisplayName, Option<String>) {
        let requested = display_name.and_then(|name| DisplayName::new(name).ok());

        if let Some(token) = token {
            match self.identity_provider.verify(&token).await {
                Ok(identity) => {
                    let name = requested
                        .or_else(|| DisplayName::new(identity.display_name.clone()).ok())
                        .unwrap_or_else(|| DisplayName::anonymous(connection_id));
                    return (name, Some(identity.id));
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "token verification failed, joining anonymously");
                }
            }
        }

        let name = requested.unwrap_or_else(|| DisplayName::anonymous(connection_id));
        (name, None)
    }

    async fn remove_from(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<LeaveNotice> {
        let mut notice = None;
        let result = self
            .store
            .remove_participant(room_id, connection_id, &mut |room, removed| {
                let targets = room.connection_ids();
                let event = ServerEvent::UserLeft {
                    display_name: removed.display_name.as_str().to_string(),
                    participants: room.participant_names(),
                };
                if let Some(json) = event.encode() {
                    self.pusher.broadcast(&targets, &json);
                }
                notice = Some(LeaveNotice {
                    room_id: room_id.clone(),
                    display_name: removed.display_name.as_str().to_string(),
                    participants: room.participant_names(),
                    notify_targets: targets,
                });
            })
            .await;
        match result {
            // Not a member, or the room is already gone: no notice owed.
            Ok(_) | Err(StoreError::RoomNotFound) => notice,
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "implicit leave failed");
                None
            }
        }
    }
}
