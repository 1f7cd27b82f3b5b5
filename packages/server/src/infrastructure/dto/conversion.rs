//! Conversions between domain entities and wire DTOs.

use watchparty_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, PlayerCommand, PlayerState, RoomMeta, RoomSummary};

use super::http::{RoomDetailDto, RoomSummaryDto};
use super::websocket::{PlayerStateDto, ServerEvent};

impl From<&PlayerState> for PlayerStateDto {
    fn from(state: &PlayerState) -> Self {
        Self {
            is_playing: state.is_playing,
            position_seconds: state.position.value(),
            media_ref: state
                .media_ref
                .as_ref()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            last_updated_at: state.last_updated_at.value(),
        }
    }
}

/// The relayed event mirrors the accepted command verbatim; the resulting
/// state is what a later joiner sees in its snapshot.
impl From<&PlayerCommand> for ServerEvent {
    fn from(command: &PlayerCommand) -> Self {
        match command {
            PlayerCommand::Play(position) => ServerEvent::Play {
                position_seconds: position.value(),
            },
            PlayerCommand::Pause(position) => ServerEvent::Pause {
                position_seconds: position.value(),
            },
            PlayerCommand::Seek(position) => ServerEvent::Seek {
                position_seconds: position.value(),
            },
            PlayerCommand::ChangeMedia(media_ref) => ServerEvent::MediaChanged {
                media_ref: media_ref.as_str().to_string(),
            },
        }
    }
}

impl From<&ChatMessage> for ServerEvent {
    fn from(message: &ChatMessage) -> Self {
        ServerEvent::ChatMessage {
            sender_name: message.sender_name.as_str().to_string(),
            sender_id: message.sender_id.clone(),
            text: message.text.as_str().to_string(),
            sent_at: message.sent_at.value(),
        }
    }
}

/// Build a listing entry from directory metadata and live occupancy.
pub fn room_summary_dto(summary: &RoomSummary, occupancy: usize) -> RoomSummaryDto {
    RoomSummaryDto {
        id: summary.id.as_str().to_string(),
        name: summary.name.clone(),
        occupancy,
        created_at: timestamp_to_rfc3339(summary.created_at.value()),
    }
}

/// Build a room detail from directory metadata plus the live participant list.
pub fn room_detail_dto(meta: &RoomMeta, participants: Vec<String>) -> RoomDetailDto {
    RoomDetailDto {
        id: meta.id.as_str().to_string(),
        name: meta.name.clone(),
        owner_id: meta.owner_id.clone(),
        is_public: meta.is_public,
        occupancy: participants.len(),
        participants,
        created_at: timestamp_to_rfc3339(meta.created_at.value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaRef, PlayerCommand, PositionSeconds, RoomId, Timestamp};

    #[test]
    fn test_player_state_dto_uses_empty_string_for_unset_media() {
        // given:
        let state = PlayerState::initial(Timestamp::new(10));

        // when:
        let dto = PlayerStateDto::from(&state);

        // then:
        assert!(!dto.is_playing);
        assert_eq!(dto.position_seconds, 0.0);
        assert_eq!(dto.media_ref, "");
        assert_eq!(dto.last_updated_at, 10);
    }

    #[test]
    fn test_player_state_dto_carries_media_ref() {
        // given:
        let mut state = PlayerState::initial(Timestamp::new(0));
        state.apply(
            &PlayerCommand::ChangeMedia(
                MediaRef::new("https://example.com/v".to_string()).unwrap(),
            ),
            Timestamp::new(5),
        );
        state.apply(
            &PlayerCommand::Play(PositionSeconds::new(3.0).unwrap()),
            Timestamp::new(6),
        );

        // when:
        let dto = PlayerStateDto::from(&state);

        // then:
        assert_eq!(dto.media_ref, "https://example.com/v");
        assert!(dto.is_playing);
        assert_eq!(dto.position_seconds, 3.0);
    }

    #[test]
    fn test_command_relays_as_its_own_event_kind() {
        // given: a seek, which leaves the playing flag untouched
        let seek = PlayerCommand::Seek(PositionSeconds::new(10.0).unwrap());

        // when:
        let event = ServerEvent::from(&seek);

        // then: relayed as seek, not as play or pause
        assert_eq!(
            event,
            ServerEvent::Seek {
                position_seconds: 10.0
            }
        );
    }

    #[test]
    fn test_room_summary_dto_formats_created_at() {
        // given: 2023-01-01 00:00:00 UTC
        let summary = RoomSummary {
            id: RoomId::new("r1".to_string()).unwrap(),
            name: "movie night".to_string(),
            created_at: Timestamp::new(1672531200000),
        };

        // when:
        let dto = room_summary_dto(&summary, 3);

        // then:
        assert_eq!(dto.occupancy, 3);
        assert!(dto.created_at.starts_with("2023-01-01T00:00:00"));
    }
}
