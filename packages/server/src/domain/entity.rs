//! Entities of the session engine: rooms, participants, player state.

use super::error::StoreError;
use super::value_object::{
    ConnectionId, DisplayName, MediaRef, MessageContent, PositionSeconds, RoomId, Timestamp,
};

/// A connection currently joined to a room, with its display identity.
///
/// Owned by exactly one [`Room`]; created on join, removed on leave or
/// disconnect.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    /// Durable identity id when the join carried a verified token.
    pub identity_id: Option<String>,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        display_name: DisplayName,
        identity_id: Option<String>,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            display_name,
            identity_id,
            joined_at,
        }
    }
}

/// A state-changing playback command, the explicit transition table of the
/// room's player state.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Play(PositionSeconds),
    Pause(PositionSeconds),
    Seek(PositionSeconds),
    ChangeMedia(MediaRef),
}

/// The authoritative playback checkpoint for a room.
///
/// `position_seconds` is a checkpoint, not a continuously advancing value: it
/// is updated only by [`PlayerCommand`]s. Clients that want the effective
/// position extrapolate from `last_updated_at` themselves; the server never
/// does.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub is_playing: bool,
    pub position: PositionSeconds,
    pub media_ref: Option<MediaRef>,
    pub last_updated_at: Timestamp,
}

impl PlayerState {
    /// Initial state of a freshly created room: paused at zero, no media.
    pub fn initial(now: Timestamp) -> Self {
        Self {
            is_playing: false,
            position: PositionSeconds::zero(),
            media_ref: None,
            last_updated_at: now,
        }
    }

    /// Apply a playback command at time `now`.
    pub fn apply(&mut self, command: &PlayerCommand, now: Timestamp) {
        match command {
            PlayerCommand::Play(position) => {
                self.is_playing = true;
                self.position = *position;
            }
            PlayerCommand::Pause(position) => {
                self.is_playing = false;
                self.position = *position;
            }
            PlayerCommand::Seek(position) => {
                // is_playing unchanged
                self.position = *position;
            }
            PlayerCommand::ChangeMedia(media_ref) => {
                self.media_ref = Some(media_ref.clone());
                self.is_playing = false;
                self.position = PositionSeconds::zero();
            }
        }
        self.last_updated_at = now;
    }
}

/// A watch session: participant set plus the authoritative player state.
///
/// Participants are kept in insertion order of join, which is the order the
/// presence UI shows them in.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub player_state: PlayerState,
    pub created_at: Timestamp,
    /// Set when the last participant leaves, cleared on rejoin. Drives the
    /// grace-period eviction sweep.
    pub empty_since: Option<Timestamp>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            player_state: PlayerState::initial(created_at),
            created_at,
            empty_since: None,
        }
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.participants
            .iter()
            .any(|p| p.connection_id == *connection_id)
    }

    /// Add a participant. Clears `empty_since` so a pending eviction is
    /// cancelled by the rejoin.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), StoreError> {
        if self.contains(&participant.connection_id) {
            return Err(StoreError::AlreadyJoined);
        }
        self.participants.push(participant);
        self.empty_since = None;
        Ok(())
    }

    /// Remove a participant by connection id. If this empties the room, the
    /// eviction countdown starts at `now`.
    pub fn remove_participant(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.connection_id == *connection_id)?;
        let removed = self.participants.remove(index);
        if self.participants.is_empty() {
            self.empty_since = Some(now);
        }
        Some(removed)
    }

    /// Display names in insertion order of join.
    pub fn participant_names(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|p| p.display_name.as_str().to_string())
            .collect()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.connection_id).collect()
    }

    /// True when the room has been continuously empty for at least
    /// `grace_period_millis`.
    pub fn is_expired(&self, now: Timestamp, grace_period_millis: i64) -> bool {
        match self.empty_since {
            Some(since) => since.elapsed_until(now) >= grace_period_millis,
            None => false,
        }
    }
}

/// An ephemeral chat message. Not retained by the engine beyond the broadcast
/// call; optionally forwarded to the chat archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub sender_name: DisplayName,
    pub sender_id: Option<String>,
    pub text: MessageContent,
    pub sent_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(name: &str) -> Participant {
        Participant::new(
            ConnectionId::generate(),
            DisplayName::new(name.to_string()).unwrap(),
            None,
            Timestamp::new(0),
        )
    }

    fn test_room() -> Room {
        Room::new(RoomId::new("r1".to_string()).unwrap(), Timestamp::new(0))
    }

    #[test]
    fn test_initial_player_state_is_paused_at_zero() {
        // given / when:
        let state = PlayerState::initial(Timestamp::new(7));

        // then:
        assert!(!state.is_playing);
        assert_eq!(state.position.value(), 0.0);
        assert_eq!(state.media_ref, None);
        assert_eq!(state.last_updated_at, Timestamp::new(7));
    }

    #[test]
    fn test_play_sets_playing_and_position() {
        // given:
        let mut state = PlayerState::initial(Timestamp::new(0));

        // when:
        let pos = PositionSeconds::new(42.5).unwrap();
        state.apply(&PlayerCommand::Play(pos), Timestamp::new(100));

        // then:
        assert!(state.is_playing);
        assert_eq!(state.position.value(), 42.5);
        assert_eq!(state.last_updated_at, Timestamp::new(100));
    }

    #[test]
    fn test_pause_clears_playing_and_sets_position() {
        // given:
        let mut state = PlayerState::initial(Timestamp::new(0));
        state.apply(
            &PlayerCommand::Play(PositionSeconds::new(10.0).unwrap()),
            Timestamp::new(50),
        );

        // when:
        state.apply(
            &PlayerCommand::Pause(PositionSeconds::new(12.0).unwrap()),
            Timestamp::new(60),
        );

        // then:
        assert!(!state.is_playing);
        assert_eq!(state.position.value(), 12.0);
    }

    #[test]
    fn test_seek_keeps_playing_flag() {
        // given: playing at 10s
        let mut state = PlayerState::initial(Timestamp::new(0));
        state.apply(
            &PlayerCommand::Play(PositionSeconds::new(10.0).unwrap()),
            Timestamp::new(50),
        );

        // when:
        state.apply(
            &PlayerCommand::Seek(PositionSeconds::new(99.0).unwrap()),
            Timestamp::new(60),
        );

        // then: still playing, position moved
        assert!(state.is_playing);
        assert_eq!(state.position.value(), 99.0);
        assert_eq!(state.last_updated_at, Timestamp::new(60));
    }

    #[test]
    fn test_change_media_resets_to_paused_zero() {
        // given: playing mid-way through some media
        let mut state = PlayerState::initial(Timestamp::new(0));
        state.apply(
            &PlayerCommand::Play(PositionSeconds::new(100.0).unwrap()),
            Timestamp::new(50),
        );

        // when:
        let media = MediaRef::new("https://example.com/v2".to_string()).unwrap();
        state.apply(&PlayerCommand::ChangeMedia(media.clone()), Timestamp::new(60));

        // then:
        assert!(!state.is_playing);
        assert_eq!(state.position.value(), 0.0);
        assert_eq!(state.media_ref, Some(media));
    }

    #[test]
    fn test_add_participant_rejects_duplicate_connection() {
        // given:
        let mut room = test_room();
        let alice = participant("alice");

        // when:
        room.add_participant(alice.clone()).unwrap();
        let result = room.add_participant(alice);

        // then:
        assert_eq!(result, Err(StoreError::AlreadyJoined));
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn test_participant_names_in_join_order() {
        // given:
        let mut room = test_room();

        // when: join order charlie, alice, bob
        room.add_participant(participant("charlie")).unwrap();
        room.add_participant(participant("alice")).unwrap();
        room.add_participant(participant("bob")).unwrap();

        // then: insertion order preserved, not sorted
        assert_eq!(room.participant_names(), vec!["charlie", "alice", "bob"]);
    }

    #[test]
    fn test_removing_last_participant_starts_eviction_countdown() {
        // given:
        let mut room = test_room();
        let alice = participant("alice");
        let id = alice.connection_id;
        room.add_participant(alice).unwrap();

        // when:
        let removed = room.remove_participant(&id, Timestamp::new(500));

        // then:
        assert!(removed.is_some());
        assert_eq!(room.empty_since, Some(Timestamp::new(500)));
    }

    #[test]
    fn test_removing_one_of_many_does_not_start_countdown() {
        // given:
        let mut room = test_room();
        let alice = participant("alice");
        let id = alice.connection_id;
        room.add_participant(alice).unwrap();
        room.add_participant(participant("bob")).unwrap();

        // when:
        room.remove_participant(&id, Timestamp::new(500));

        // then:
        assert_eq!(room.empty_since, None);
    }

    #[test]
    fn test_rejoin_clears_eviction_countdown() {
        // given: emptied room with a pending countdown
        let mut room = test_room();
        let alice = participant("alice");
        let id = alice.connection_id;
        room.add_participant(alice).unwrap();
        room.remove_participant(&id, Timestamp::new(500));
        assert!(room.empty_since.is_some());

        // when:
        room.add_participant(participant("bob")).unwrap();

        // then:
        assert_eq!(room.empty_since, None);
    }

    #[test]
    fn test_is_expired_respects_grace_period() {
        // given: empty since t=1000, grace period 5000ms
        let mut room = test_room();
        room.empty_since = Some(Timestamp::new(1000));

        // then:
        assert!(!room.is_expired(Timestamp::new(5999), 5000));
        assert!(room.is_expired(Timestamp::new(6000), 5000));
    }

    #[test]
    fn test_remove_unknown_participant_is_none() {
        // given:
        let mut room = test_room();
        room.add_participant(participant("alice")).unwrap();

        // when:
        let removed = room.remove_participant(&ConnectionId::generate(), Timestamp::new(0));

        // then:
        assert!(removed.is_none());
        assert_eq!(room.participants.len(), 1);
    }
}
