//! Session server surface: WebSocket protocol endpoint plus the HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
