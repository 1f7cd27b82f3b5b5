//! Value objects of the session engine.
//!
//! Each value object validates on construction, so the rest of the engine
//! never has to re-check invariants like "position is non-negative" or
//! "chat text is non-empty".

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Validation failure for a value object constructor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} contains invalid characters")]
    InvalidCharacters { field: &'static str },
    #[error("position must be a finite, non-negative number of seconds (got {0})")]
    InvalidPosition(f64),
}

/// Identifier of a live network connection.
///
/// Unique per open connection and never reused while the connection is open;
/// a fresh one is allocated on every WebSocket upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Allocate a fresh connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short suffix used to build anonymous display names.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const ROOM_ID_MAX_LEN: usize = 64;

/// Identifier of a watch session. Shared between the live session engine and
/// the durable room directory, so both refer to the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "room_id" });
        }
        if trimmed.len() > ROOM_ID_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "room_id",
                max: ROOM_ID_MAX_LEN,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidCharacters { field: "room_id" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Factory for fresh room identifiers, used when a room is created explicitly
/// through the directory rather than lazily on first join.
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        // uuid simple form is ascii alphanumeric, always a valid RoomId
        RoomId(Uuid::new_v4().simple().to_string())
    }
}

const DISPLAY_NAME_MAX_LEN: usize = 64;

/// Display identity of a participant as seen by other participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "display_name",
            });
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "display_name",
                max: DISPLAY_NAME_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fallback name for a connection without a usable identity.
    pub fn anonymous(connection_id: &ConnectionId) -> Self {
        Self(format!("guest-{}", connection_id.short()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const MESSAGE_CONTENT_MAX_LEN: usize = 2000;

/// Chat message text, non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        if trimmed.chars().count() > MESSAGE_CONTENT_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "text",
                max: MESSAGE_CONTENT_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

const MEDIA_REF_MAX_LEN: usize = 2048;

/// Reference to the media a room is watching (typically a URL).
///
/// The engine only replicates the reference; it never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "media_ref" });
        }
        if trimmed.chars().count() > MEDIA_REF_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "media_ref",
                max: MEDIA_REF_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Playback position in seconds. Finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSeconds(f64);

impl PositionSeconds {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidPosition(value));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` to `later` (negative if `later` is
    /// earlier).
    pub fn elapsed_until(&self, later: Timestamp) -> i64 {
        later.0 - self.0
    }
}
