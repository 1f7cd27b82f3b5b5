//! In-memory repository implementations.
//!
//! The session engine is single-process and keeps all live state in memory;
//! these are the production implementations, not test stubs. Durable
//! alternatives (a SQL room directory, a persisted chat archive) would slot
//! in beside them.

pub mod chat_archive;
pub mod directory;
pub mod room_store;

pub use chat_archive::InMemoryChatArchive;
pub use directory::InMemoryRoomDirectory;
pub use room_store::InMemoryRoomStore;
