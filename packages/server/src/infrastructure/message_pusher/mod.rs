//! Broadcast dispatcher implementations.
//!
//! This module provides the concrete [`MessagePusher`](crate::domain::MessagePusher)
//! implementations. Currently only WebSocket; a pub/sub fan-out (for
//! multi-process deployments) would slot in here as another implementation.

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
