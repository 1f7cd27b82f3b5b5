//! Background sweep reclaiming rooms left empty past the grace period.
//!
//! Eviction is routine cleanup, never a user-facing error; it is logged and
//! nothing else. The sweep logic itself lives in the store
//! ([`RoomStore::reap_expired`](crate::domain::RoomStore::reap_expired)) so
//! tests drive it directly with a logical clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::RoomStore;

/// Spawn the eviction sweep on a fixed interval (design default 60s).
pub fn spawn_reaper(store: Arc<dyn RoomStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The immediate first tick has nothing to do on a fresh store
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.reap_expired().await;
            for room_id in &evicted {
                tracing::info!(room_id = %room_id, "evicted room empty past grace period");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, Participant, RoomId, Timestamp};
    use crate::infrastructure::repository::InMemoryRoomStore;
    use watchparty_shared::time::ManualClock;

    #[tokio::test(start_paused = true)]
    async fn test_reaper_evicts_on_interval() {
        // given: a room emptied at t=0 with a 1s grace period
        let clock = Arc::new(ManualClock::new(0));
        let store: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new(
            clock.clone(),
            Duration::from_millis(1000),
        ));
        let room_id = RoomId::new("r1".to_string()).unwrap();
        let alice = Participant::new(
            ConnectionId::generate(),
            DisplayName::new("alice".to_string()).unwrap(),
            None,
            Timestamp::new(0),
        );
        store
            .add_participant(&room_id, alice.clone(), &mut |_| {})
            .await
            .unwrap();
        store
            .remove_participant(&room_id, &alice.connection_id, &mut |_, _| {})
            .await
            .unwrap();

        let handle = spawn_reaper(store.clone(), Duration::from_millis(100));

        // when: logical time passes the grace period and the reaper ticks
        clock.advance(2000);
        tokio::time::sleep(Duration::from_millis(250)).await;

        // then:
        assert!(store.get_room(&room_id).await.is_none());
        handle.abort();
    }
}
