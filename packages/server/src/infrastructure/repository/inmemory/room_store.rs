//! In-memory [`RoomStore`] implementation.
//!
//! Rooms live in a `HashMap` behind an outer mutex; each room carries its own
//! mutex so mutations on the same room are serialized while distinct rooms
//! proceed in parallel. Map membership changes (creation, eviction) hold the
//! outer lock, which makes the eviction sweep and a concurrent rejoin unable
//! to interleave: a join that arrives during a sweep waits and recreates the
//! room cleanly if it was evicted.
//!
//! Lock order is always map -> room; no code path takes them in the other
//! direction. Relay hooks run while the room lock is held, so whatever they
//! enqueue is ordered exactly as the mutations were applied; hooks must not
//! block (the pusher enqueue does not).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use watchparty_shared::time::Clock;

use crate::domain::{
    ConnectionId, Participant, PlayerCommand, PlayerState, RemovalRelay, Room, RoomId, RoomRelay,
    RoomStore, StoreError, Timestamp,
};

/// In-memory table of active rooms with per-room mutual exclusion.
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<Room>>>>,
    clock: Arc<dyn Clock>,
    grace_period: Duration,
}

impl InMemoryRoomStore {
    pub fn new(clock: Arc<dyn Clock>, grace_period: Duration) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
            grace_period,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// Clone the handle of an existing room. Holds the map lock only for the
    /// lookup.
    async fn handle(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    /// Clone the handle of a room, creating it first if absent.
    async fn handle_or_create(&self, room_id: &RoomId) -> Arc<Mutex<Room>> {
        let mut rooms = self.rooms.lock().await;
        let now = self.now();
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::debug!(room_id = %room_id, "creating room");
                Arc::new(Mutex::new(Room::new(room_id.clone(), now)))
            })
            .clone()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn get_or_create(&self, room_id: &RoomId) -> Room {
        let handle = self.handle_or_create(room_id).await;
        let room = handle.lock().await;
        room.clone()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let handle = self.handle(room_id).await?;
        let room = handle.lock().await;
        Some(room.clone())
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
        on_joined: RoomRelay<'_>,
    ) -> Result<Room, StoreError> {
        // Lazy creation: the first join with a given id brings the room up.
        let handle = self.handle_or_create(room_id).await;
        let mut room = handle.lock().await;
        room.add_participant(participant)?;
        on_joined(&room);
        Ok(room.clone())
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        on_removed: RemovalRelay<'_>,
    ) -> Result<(Room, Option<Participant>), StoreError> {
        let handle = self
            .handle(room_id)
            .await
            .ok_or(StoreError::RoomNotFound)?;
        let now = self.now();
        let mut room = handle.lock().await;
        let removed = room.remove_participant(connection_id, now);
        if let Some(removed) = &removed {
            on_removed(&room, removed);
        }
        Ok((room.clone(), removed))
    }

    async fn update_player_state(
        &self,
        room_id: &RoomId,
        command: PlayerCommand,
        on_applied: RoomRelay<'_>,
    ) -> Result<PlayerState, StoreError> {
        let handle = self
            .handle(room_id)
            .await
            .ok_or(StoreError::RoomNotFound)?;
        let now = self.now();
        let mut room = handle.lock().await;
        room.player_state.apply(&command, now);
        on_applied(&room);
        Ok(room.player_state.clone())
    }

    async fn relay_to_room(
        &self,
        room_id: &RoomId,
        relay: RoomRelay<'_>,
    ) -> Result<(), StoreError> {
        let handle = self
            .handle(room_id)
            .await
            .ok_or(StoreError::RoomNotFound)?;
        let room = handle.lock().await;
        relay(&room);
        Ok(())
    }

    async fn list_participant_names(&self, room_id: &RoomId) -> Result<Vec<String>, StoreError> {
        let handle = self
            .handle(room_id)
            .await
            .ok_or(StoreError::RoomNotFound)?;
        let room = handle.lock().await;
        Ok(room.participant_names())
    }

    async fn participant_connections(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        match self.handle(room_id).await {
            Some(handle) => {
                let room = handle.lock().await;
                room.connection_ids()
            }
            None => Vec::new(),
        }
    }

    async fn occupancy(&self, room_id: &RoomId) -> usize {
        match self.handle(room_id).await {
            Some(handle) => {
                let room = handle.lock().await;
                room.participants.len()
            }
            None => 0,
        }
    }

    async fn reap_expired(&self) -> Vec<RoomId> {
        // The map lock is held across the whole sweep so a concurrent join
        // either completes before the sweep sees the room (countdown
        // cleared) or waits and recreates the room after eviction.
        let mut rooms = self.rooms.lock().await;
        let now = self.now();
        let grace_millis = self.grace_period.as_millis() as i64;

        let mut expired = Vec::new();
        for (id, handle) in rooms.iter() {
            let room = handle.lock().await;
            if room.is_expired(now, grace_millis) {
                expired.push(id.clone());
            }
        }
        for id in &expired {
            rooms.remove(id);
        }
        expired
    }
}
