//! UseCase: leaving a room.
//!
//! Covers both the explicit leave event and the synthetic leave the
//! disconnect path feeds through; the room sees no difference between the
//! two. The user-left frame is enqueued inside the store's removal hook, so
//! the remaining participants see it ordered with everything else that
//! happened to the room.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomStore, StoreError};
use crate::infrastructure::ConnectionRegistry;
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::SessionError;
use super::join_room::LeaveNotice;

pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
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

    /// Remove the connection from its current room and announce it.
    ///
    /// The connection stays registered; only its room binding is cleared.
    /// Fails with [`SessionError::NotInRoom`] when the connection is not
    /// bound to a room, or when the bound room has already been evicted.
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<LeaveNotice, SessionError> {
        let room_id = self
            .registry
            .unbind_room(&connection_id)
            .await
            .ok_or(SessionError::NotInRoom)?;

        let mut notice = None;
        let result = self
            .store
            .remove_participant(&room_id, &connection_id, &mut |room, removed| {
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
            Ok(_) => {
                let notice = notice.ok_or(SessionError::NotInRoom)?;
                tracing::info!(
                    room_id = %notice.room_id,
                    display_name = %notice.display_name,
                    "participant left"
                );
                Ok(notice)
            }
            Err(StoreError::RoomNotFound) => Err(SessionError::NotInRoom),
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "leave failed");
                Err(SessionError::NotInRoom)
            }
        }
    }
}
