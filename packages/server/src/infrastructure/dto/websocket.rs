//! WebSocket event DTOs.
//!
//! Every frame is an internally tagged JSON object; the `type` field carries
//! the kebab-case event name. Inbound and outbound events are separate enums
//! because the two directions share almost no shapes.

use serde::{Deserialize, Serialize};

/// Events a client sends to the server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join a room, creating it lazily if absent. `token` is an optional
    /// credential; without a usable identity the join proceeds anonymously.
    JoinRoom {
        room_id: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        display_name: Option<String>,
    },
    /// Leave the current room without closing the connection.
    Leave,
    Play {
        position_seconds: f64,
    },
    Pause {
        position_seconds: f64,
    },
    Seek {
        position_seconds: f64,
    },
    ChangeMedia {
        media_ref: String,
    },
    Chat {
        text: String,
    },
}

/// Playback checkpoint as sent to clients. `last_updated_at` is the server's
/// own clock so clients can compensate for relay delay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerStateDto {
    pub is_playing: bool,
    pub position_seconds: f64,
    pub media_ref: String,
    pub last_updated_at: i64,
}

/// Events the server sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Snapshot handed to a joiner: the stored checkpoint verbatim plus the
    /// participant list in join order.
    RoomState {
        room_id: String,
        player_state: PlayerStateDto,
        participants: Vec<String>,
    },
    UserJoined {
        display_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        identity_id: Option<String>,
    },
    UserLeft {
        display_name: String,
        participants: Vec<String>,
    },
    Play {
        position_seconds: f64,
    },
    Pause {
        position_seconds: f64,
    },
    Seek {
        position_seconds: f64,
    },
    MediaChanged {
        media_ref: String,
    },
    ChatMessage {
        sender_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender_id: Option<String>,
        text: String,
        sent_at: i64,
    },
    /// Sent only to the connection whose event failed; never broadcast.
    Error {
        code: String,
        message: String,
    },
}

impl ServerEvent {
    /// Serialize for the wire. These shapes cannot fail to serialize; the
    /// error arm exists so a future variant change degrades to a log line
    /// instead of a panic.
    pub fn encode(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("failed to encode server event: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_room_event_parses_with_optional_fields_absent() {
        // given:
        let json = r#"{"type":"join-room","room_id":"movie-night"}"#;

        // when:
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then:
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: "movie-night".to_string(),
                token: None,
                display_name: None,
            }
        );
    }

    #[test]
    fn test_playback_events_parse_kebab_case_tags() {
        let play: ClientEvent =
            serde_json::from_str(r#"{"type":"play","position_seconds":42.5}"#).unwrap();
        assert_eq!(
            play,
            ClientEvent::Play {
                position_seconds: 42.5
            }
        );

        let change: ClientEvent =
            serde_json::from_str(r#"{"type":"change-media","media_ref":"https://example.com/v"}"#)
                .unwrap();
        assert_eq!(
            change,
            ClientEvent::ChangeMedia {
                media_ref: "https://example.com/v".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"teleport","x":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_serializes_tag_and_skips_absent_identity() {
        // given:
        let event = ServerEvent::UserJoined {
            display_name: "alice".to_string(),
            identity_id: None,
        };

        // when:
        let json = serde_json::to_string(&event).unwrap();

        // then:
        assert!(json.contains(r#""type":"user-joined""#));
        assert!(!json.contains("identity_id"));
    }

    #[test]
    fn test_room_state_round_trips() {
        // given:
        let event = ServerEvent::RoomState {
            room_id: "r1".to_string(),
            player_state: PlayerStateDto {
                is_playing: true,
                position_seconds: 100.0,
                media_ref: "https://example.com/v".to_string(),
                last_updated_at: 1234,
            },
            participants: vec!["alice".to_string(), "bob".to_string()],
        };

        // when:
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ServerEvent = serde_json::from_str(&json).unwrap();

        // then:
        assert_eq!(parsed, event);
    }
}
