//! WebSocket-backed [`MessagePusher`] implementation.
//!
//! The UI layer owns the WebSocket lifecycle and hands this dispatcher the
//! per-connection `UnboundedSender` at upgrade time. Each connection's writer
//! task drains its channel in order, which preserves per-recipient delivery
//! order across the fan-out step.
//!
//! Every operation is a plain enqueue behind a short-lived `std` mutex, never
//! held across an await. That keeps the whole pusher callable from inside a
//! room's critical section (see the relay hooks on `RoomStore`).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PushError, PusherChannel};

/// Delivers serialized events to live WebSocket connections.
pub struct WebSocketMessagePusher {
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    fn connections(&self) -> std::sync::MutexGuard<'_, HashMap<ConnectionId, PusherChannel>> {
        match self.connections.lock() {
            Ok(guard) => guard,
            // No code path panics while holding the lock; recover the map
            // rather than poisoning every later delivery.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.connections().insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "connection registered with dispatcher");
    }

    fn unregister_connection(&self, connection_id: &ConnectionId) {
        self.connections().remove(connection_id);
        tracing::debug!(connection_id = %connection_id, "connection unregistered from dispatcher");
    }

    fn push_to(&self, connection_id: &ConnectionId, content: &str) -> Result<(), PushError> {
        let connections = self.connections();
        let sender = connections
            .get(connection_id)
            .ok_or_else(|| PushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| PushError::PushFailed(e.to_string()))
    }

    fn broadcast(&self, targets: &[ConnectionId], content: &str) {
        let connections = self.connections();
        for target in targets {
            match connections.get(target) {
                Some(sender) => {
                    // Stale transports are tolerated; the disconnect path
                    // cleans them up.
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!(connection_id = %target, "failed to push message: {}", e);
                    }
                }
                None => {
                    tracing::debug!(connection_id = %target, "skipping unregistered connection during broadcast");
                }
            }
        }
    }
}
