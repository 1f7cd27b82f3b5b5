//! Broadcast dispatcher trait.

use tokio::sync::mpsc;

use super::error::PushError;
use super::value_object::ConnectionId;

/// Outbound channel of a single connection. The writer task on the other end
/// drains it in order, so per-recipient delivery order matches the order
/// messages were enqueued.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers serialized events to live connections.
///
/// Every operation is a non-blocking enqueue or registry update and must not
/// block or await. That lets callers enqueue inside a room's critical
/// section, which is what serializes delivery order with state mutations
/// (see [`RoomStore`](super::store::RoomStore)).
///
/// Delivery is best-effort: a recipient whose transport has gone stale is
/// skipped, never an error, and a failed delivery never fails the event that
/// triggered it.
pub trait MessagePusher: Send + Sync {
    /// Attach the outbound channel of a newly opened connection.
    fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach a closed connection. Subsequent deliveries to it are no-ops.
    fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Enqueue a message to a single connection.
    fn push_to(&self, connection_id: &ConnectionId, content: &str) -> Result<(), PushError>;

    /// Enqueue a message to each target connection. Unreachable targets are
    /// logged and skipped.
    fn broadcast(&self, targets: &[ConnectionId], content: &str);
}
