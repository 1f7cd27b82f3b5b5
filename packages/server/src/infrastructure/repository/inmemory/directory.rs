//! In-memory [`RoomDirectory`] implementation.
//!
//! Stands in for the durable metadata store the discovery screens read from.
//! A DBMS-backed implementation would provide the same trait with a DTO
//! conversion layer in between.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use watchparty_shared::time::Clock;

use crate::domain::{
    DirectoryError, NewRoomMeta, RoomDirectory, RoomId, RoomIdFactory, RoomMeta, RoomSummary,
    Timestamp,
};

pub struct InMemoryRoomDirectory {
    records: Mutex<HashMap<RoomId, RoomMeta>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomDirectory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn list_public_rooms(&self) -> Vec<RoomSummary> {
        let records = self.records.lock().await;
        let mut summaries: Vec<RoomSummary> = records
            .values()
            .filter(|meta| meta.is_public)
            .map(|meta| RoomSummary {
                id: meta.id.clone(),
                name: meta.name.clone(),
                created_at: meta.created_at,
            })
            .collect();
        // Newest first, ties broken by id for a stable listing
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        summaries
    }

    async fn create_room_record(&self, meta: NewRoomMeta) -> RoomId {
        let id = RoomIdFactory::generate();
        let record = RoomMeta {
            id: id.clone(),
            name: meta.name,
            owner_id: meta.owner_id,
            is_public: meta.is_public,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        let mut records = self.records.lock().await;
        records.insert(id.clone(), record);
        tracing::info!(room_id = %id, "room record created");
        id
    }

    async fn get_room_record(&self, room_id: &RoomId) -> Result<RoomMeta, DirectoryError> {
        let records = self.records.lock().await;
        records.get(room_id).cloned().ok_or(DirectoryError::NotFound)
    }
}
