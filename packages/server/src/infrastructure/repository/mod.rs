//! Repository implementations.

pub mod inmemory;

pub use inmemory::{InMemoryChatArchive, InMemoryRoomDirectory, InMemoryRoomStore};
