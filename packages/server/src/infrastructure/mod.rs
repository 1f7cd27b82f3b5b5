//! Infrastructure layer: concrete implementations of the domain's trait
//! seams plus the wire-format DTOs.

pub mod connection_registry;
pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod reaper;
pub mod repository;

pub use connection_registry::ConnectionRegistry;
pub use identity::InMemoryIdentityProvider;
pub use reaper::spawn_reaper;
