//! Use case layer: one struct per session operation.
//!
//! Use cases mutate state through the domain traits and enqueue the
//! resulting frames inside the store's relay hooks, under the room's
//! critical section; the returned outcome records what happened and who was
//! told. The UI layer only parses inbound frames and answers the sender's
//! own errors.

pub mod chat;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod playback;
pub mod rooms;

pub use chat::{ChatOutcome, ChatUseCase};
pub use error::{RoomDetailError, SessionError};
pub use join_room::{JoinOutcome, JoinRoomUseCase, LeaveNotice};
pub use leave_room::LeaveRoomUseCase;
pub use playback::{PlaybackOutcome, PlaybackUseCase};
pub use rooms::{CreateRoomUseCase, GetRoomDetailUseCase, ListRoomsUseCase};
