//! UseCases: room discovery against the durable directory.
//!
//! The directory owns the metadata; the live store is only consulted for
//! occupancy and the presence list. A directory room with no live session
//! simply reports zero occupancy.

use std::sync::Arc;

use crate::domain::{
    DirectoryError, NewRoomMeta, RoomDirectory, RoomId, RoomMeta, RoomStore, RoomSummary,
};

use super::error::{RoomDetailError, SessionError};

pub struct ListRoomsUseCase {
    directory: Arc<dyn RoomDirectory>,
    store: Arc<dyn RoomStore>,
}

impl ListRoomsUseCase {
    pub fn new(directory: Arc<dyn RoomDirectory>, store: Arc<dyn RoomStore>) -> Self {
        Self { directory, store }
    }

    /// Public rooms, newest first, each with its live occupancy.
    pub async fn execute(&self) -> Vec<(RoomSummary, usize)> {
        let summaries = self.directory.list_public_rooms().await;
        let mut listed = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let occupancy = self.store.occupancy(&summary.id).await;
            listed.push((summary, occupancy));
        }
        listed
    }
}

pub struct CreateRoomUseCase {
    directory: Arc<dyn RoomDirectory>,
}

impl CreateRoomUseCase {
    pub fn new(directory: Arc<dyn RoomDirectory>) -> Self {
        Self { directory }
    }

    /// Create a directory record; the live session starts on first join.
    pub async fn execute(&self, meta: NewRoomMeta) -> Result<RoomId, SessionError> {
        if meta.name.trim().is_empty() {
            return Err(SessionError::InvalidPayload(
                "room name must not be empty".to_string(),
            ));
        }
        Ok(self.directory.create_room_record(meta).await)
    }
}

pub struct GetRoomDetailUseCase {
    directory: Arc<dyn RoomDirectory>,
    store: Arc<dyn RoomStore>,
}

impl GetRoomDetailUseCase {
    pub fn new(directory: Arc<dyn RoomDirectory>, store: Arc<dyn RoomStore>) -> Self {
        Self { directory, store }
    }

    /// Directory metadata plus the live presence list (empty when no session
    /// is running).
    pub async fn execute(&self, room_id: String) -> Result<(RoomMeta, Vec<String>), RoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|e| RoomDetailError::InvalidRoomId(e.to_string()))?;

        let meta = match self.directory.get_room_record(&room_id).await {
            Ok(meta) => meta,
            Err(DirectoryError::NotFound) => return Err(RoomDetailError::NotFound),
        };

        let participants = self
            .store
            .list_participant_names(&room_id)
            .await
            .unwrap_or_default();

        Ok((meta, participants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collaborators::MockRoomDirectory;
    use crate::domain::{DisplayName, Participant, Timestamp};
    use crate::infrastructure::repository::{InMemoryRoomDirectory, InMemoryRoomStore};
    use crate::domain::ConnectionId;
    use std::time::Duration;
    use watchparty_shared::time::FixedClock;

    fn store() -> Arc<dyn RoomStore> {
        Arc::new(InMemoryRoomStore::new(
            Arc::new(FixedClock::new(0)),
            Duration::from_millis(5000),
        ))
    }

    async fn occupy(store: &Arc<dyn RoomStore>, room_id: &RoomId, names: &[&str]) {
        for name in names {
            store
                .add_participant(
                    room_id,
                    Participant::new(
                        ConnectionId::generate(),
                        DisplayName::new(name.to_string()).unwrap(),
                        None,
                        Timestamp::new(0),
                    ),
                    &mut |_| {},
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_listing_reports_live_occupancy() {
        // given: two directory rooms, one with a live session
        let directory = Arc::new(InMemoryRoomDirectory::new(Arc::new(FixedClock::new(0))));
        let store = store();
        let busy = directory
            .create_room_record(NewRoomMeta {
                name: "busy".to_string(),
                owner_id: None,
                is_public: true,
            })
            .await;
        directory
            .create_room_record(NewRoomMeta {
                name: "idle".to_string(),
                owner_id: None,
                is_public: true,
            })
            .await;
        occupy(&store, &busy, &["alice", "bob"]).await;

        // when:
        let usecase = ListRoomsUseCase::new(directory, store);
        let listed = usecase.execute().await;

        // then:
        assert_eq!(listed.len(), 2);
        let occupancy_of = |name: &str| {
            listed
                .iter()
                .find(|(s, _)| s.name == name)
                .map(|(_, n)| *n)
                .unwrap()
        };
        assert_eq!(occupancy_of("busy"), 2);
        assert_eq!(occupancy_of("idle"), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        // given: a directory that must not be called
        let mut directory = MockRoomDirectory::new();
        directory.expect_create_room_record().times(0);
        let usecase = CreateRoomUseCase::new(Arc::new(directory));

        // then:
        let result = usecase
            .execute(NewRoomMeta {
                name: "   ".to_string(),
                owner_id: None,
                is_public: true,
            })
            .await;
        assert!(matches!(result, Err(SessionError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_detail_combines_metadata_and_presence() {
        // given:
        let directory = Arc::new(InMemoryRoomDirectory::new(Arc::new(FixedClock::new(7))));
        let store = store();
        let id = directory
            .create_room_record(NewRoomMeta {
                name: "movie night".to_string(),
                owner_id: Some("owner-1".to_string()),
                is_public: true,
            })
            .await;
        occupy(&store, &id, &["alice"]).await;

        // when:
        let usecase = GetRoomDetailUseCase::new(directory, store);
        let (meta, participants) = usecase.execute(id.as_str().to_string()).await.unwrap();

        // then:
        assert_eq!(meta.name, "movie night");
        assert_eq!(participants, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_detail_of_unknown_room_is_not_found() {
        let directory = Arc::new(InMemoryRoomDirectory::new(Arc::new(FixedClock::new(0))));
        let usecase = GetRoomDetailUseCase::new(directory, store());
        assert_eq!(
            usecase.execute("nope".to_string()).await,
            Err(RoomDetailError::NotFound)
        );
    }
}
