//! Watch-together session synchronization server.
//!
//! Keeps every participant of a room on the same media, at the same
//! position, in the same play state, by relaying playback events and
//! handing authoritative snapshots to new joiners.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
