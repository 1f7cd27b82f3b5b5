//! UseCase: chat relay.
//!
//! Chat is broadcast to the whole room, sender included, so every client
//! renders the same confirmed timeline. The enqueue happens inside the
//! store's relay hook, under the room's mutual exclusion: targets are the
//! membership at enqueue time, and a chat frame can never overtake or trail
//! a playback frame it was produced next to. Messages are not kept in room
//! state; the optional archive gets a fire-and-forget copy off the hot path.

use std::sync::Arc;

use watchparty_shared::time::Clock;

use crate::domain::{
    ChatArchive, ChatMessage, ConnectionId, MessageContent, MessagePusher, Room, RoomStore,
    Timestamp,
};
use crate::infrastructure::ConnectionRegistry;
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::SessionError;

/// Result of a chat relay: the stamped message and who received it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub message: ChatMessage,
    /// Connections the frame was enqueued to, resolved under the room lock.
    pub notify_targets: Vec<ConnectionId>,
}

pub struct ChatUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    archive: Arc<dyn ChatArchive>,
    clock: Arc<dyn Clock>,
}

impl ChatUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<ConnectionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        archive: Arc<dyn ChatArchive>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
            archive,
            clock,
        }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        text: String,
    ) -> Result<ChatOutcome, SessionError> {
        let room_id = self
            .registry
            .lookup_room(&connection_id)
            .await
            .ok_or(SessionError::NotInRoom)?;

        let text = MessageContent::new(text)?;
        let sent_at = Timestamp::new(self.clock.now_millis());

        let mut outcome = None;
        self.store
            .relay_to_room(&room_id, &mut |room: &Room| {
                // The sender may have raced its own leave; the hook simply
                // does nothing then and the caller answers not-in-room.
                let Some(sender) = room
                    .participants
                    .iter()
                    .find(|p| p.connection_id == connection_id)
                else {
                    return;
                };

                let message = ChatMessage {
                    room_id: room_id.clone(),
                    sender_name: sender.display_name.clone(),
                    sender_id: sender.identity_id.clone(),
                    text: text.clone(),
                    sent_at,
                };
                let targets = room.connection_ids();
                if let Some(json) = ServerEvent::from(&message).encode() {
                    self.pusher.broadcast(&targets, &json);
                }
                outcome = Some(ChatOutcome {
                    message,
                    notify_targets: targets,
                });
            })
            .await
            .map_err(|_| SessionError::NotInRoom)?;
        let outcome = outcome.ok_or(SessionError::NotInRoom)?;

        // Archive off the hot path; the broadcast never waits on it.
        let archive = self.archive.clone();
        let archived = outcome.message.clone();
        tokio::spawn(async move {
            archive.append(archived).await;
        });

        Ok(outcome)
    }
}
