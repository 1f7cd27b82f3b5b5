//! UseCase: playback commands (play, pause, seek, change-media).
//!
//! Every command follows the same shape: resolve the sender's room, apply
//! the command to the authoritative player state, and enqueue the relay to
//! the room *inside the store's relay hook*, while the room's mutual
//! exclusion is still held. That pins delivery order to application order
//! and resolves the target set at enqueue time. Play, pause and seek are
//! relayed to everyone except the sender; change-media goes to the whole
//! room, sender included, so every client loads the new media from the same
//! confirmed event.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, PlayerCommand, PlayerState, Room, RoomId, RoomStore, StoreError,
};
use crate::infrastructure::ConnectionRegistry;
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::SessionError;

/// Result of a playback command: the updated state and who was notified.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOutcome {
    pub room_id: RoomId,
    pub state: PlayerState,
    /// Connections the relay was enqueued to, resolved under the room lock.
    pub notify_targets: Vec<ConnectionId>,
}

pub struct PlaybackUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl PlaybackUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<ConnectionRegistry>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
        }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        command: PlayerCommand,
    ) -> Result<PlaybackOutcome, SessionError> {
        let room_id = self
            .registry
            .lookup_room(&connection_id)
            .await
            .ok_or(SessionError::NotInRoom)?;

        let include_sender = matches!(command, PlayerCommand::ChangeMedia(_));
        let relayed = ServerEvent::from(&command).encode();

        let mut notify_targets = Vec::new();
        let result = self
            .store
            .update_player_state(&room_id, command, &mut |room: &Room| {
                let targets: Vec<ConnectionId> = room
                    .connection_ids()
                    .into_iter()
                    .filter(|id| include_sender || *id != connection_id)
                    .collect();
                if let Some(json) = &relayed {
                    self.pusher.broadcast(&targets, json);
                }
                notify_targets = targets;
            })
            .await;

        let state = match result {
            Ok(state) => state,
            // The bound room was evicted under the connection; same answer as
            // never having joined.
            Err(StoreError::RoomNotFound) => return Err(SessionError::NotInRoom),
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "playback update failed");
                return Err(SessionError::NotInRoom);
            }
        };

        Ok(PlaybackOutcome {
            room_id,
            state,
            notify_targets,
        })
    }
}
