//! Data Transfer Objects (DTOs) for the session server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: inbound/outbound WebSocket event DTOs
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
