//! Shared utilities for the watchparty workspace.
//!
//! Provides the clock abstraction used to make time-dependent logic (room
//! eviction, playback checkpoints) testable, plus logging setup helpers.

pub mod logger;
pub mod time;
