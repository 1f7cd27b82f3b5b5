//! Connection registry: which room, if any, each live connection is bound to.
//!
//! Purely local bookkeeping indexed by connection; it needs no cross-room
//! coordination and none of its operations block on I/O.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId};

/// Tracks each live connection and its current room binding.
///
/// A connection is bound to at most one room. Binding a connection that is
/// already bound to a different room returns the previous room so the caller
/// can perform the implicit leave before completing the new join.
pub struct ConnectionRegistry {
    bindings: Mutex<HashMap<ConnectionId, Option<RoomId>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Track a newly opened connection, initially bound to no room.
    pub async fn register(&self, connection_id: ConnectionId) {
        let mut bindings = self.bindings.lock().await;
        bindings.insert(connection_id, None);
    }

    /// Bind a connection to a room. Returns the previously bound room when
    /// the connection was bound to a *different* room (the caller owes that
    /// room a leave).
    pub async fn bind_room(&self, connection_id: ConnectionId, room_id: RoomId) -> Option<RoomId> {
        let mut bindings = self.bindings.lock().await;
        let slot = bindings.entry(connection_id).or_insert(None);
        let previous = slot.take();
        *slot = Some(room_id.clone());
        previous.filter(|p| *p != room_id)
    }

    /// Clear a connection's room binding, returning the room it was bound to.
    pub async fn unbind_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut bindings = self.bindings.lock().await;
        bindings.get_mut(connection_id).and_then(Option::take)
    }

    /// Room the connection is currently bound to, if any.
    pub async fn lookup_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let bindings = self.bindings.lock().await;
        bindings.get(connection_id).cloned().flatten()
    }

    /// Forget a closed connection, returning the room it was bound to so the
    /// disconnect path can feed a synthetic leave through the handler.
    pub async fn unregister(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut bindings = self.bindings.lock().await;
        bindings.remove(connection_id).flatten()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_id(s: &str) -> RoomId {
        RoomId::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_connection_has_no_binding() {
        // given:
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;

        // then:
        assert_eq!(registry.lookup_room(&id).await, None);
    }

    #[tokio::test]
    async fn test_bind_and_lookup() {
        // given:
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;

        // when:
        let previous = registry.bind_room(id, room_id("r1")).await;

        // then:
        assert_eq!(previous, None);
        assert_eq!(registry.lookup_room(&id).await, Some(room_id("r1")));
    }

    #[tokio::test]
    async fn test_rebinding_to_other_room_returns_previous() {
        // given: bound to r1
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;
        registry.bind_room(id, room_id("r1")).await;

        // when: bound to r2
        let previous = registry.bind_room(id, room_id("r2")).await;

        // then: caller owes r1 a leave; binding is now r2
        assert_eq!(previous, Some(room_id("r1")));
        assert_eq!(registry.lookup_room(&id).await, Some(room_id("r2")));
    }

    #[tokio::test]
    async fn test_rebinding_to_same_room_owes_no_leave() {
        // given:
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;
        registry.bind_room(id, room_id("r1")).await;

        // when: duplicate bind to the same room
        let previous = registry.bind_room(id, room_id("r1")).await;

        // then:
        assert_eq!(previous, None);
        assert_eq!(registry.lookup_room(&id).await, Some(room_id("r1")));
    }

    #[tokio::test]
    async fn test_unbind_clears_binding() {
        // given:
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;
        registry.bind_room(id, room_id("r1")).await;

        // when:
        let previous = registry.unbind_room(&id).await;

        // then: connection still registered, no binding
        assert_eq!(previous, Some(room_id("r1")));
        assert_eq!(registry.lookup_room(&id).await, None);
    }

    #[tokio::test]
    async fn test_unregister_returns_bound_room() {
        // given:
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry.register(id).await;
        registry.bind_room(id, room_id("r1")).await;

        // when:
        let previous = registry.unregister(&id).await;

        // then:
        assert_eq!(previous, Some(room_id("r1")));
        assert_eq!(registry.lookup_room(&id).await, None);
    }

    #[tokio::test]
    async fn test_unregister_unknown_connection_is_none() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.unregister(&ConnectionId::generate()).await, None);
    }
}
