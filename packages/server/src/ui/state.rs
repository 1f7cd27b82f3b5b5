//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::infrastructure::ConnectionRegistry;
use crate::usecase::{
    ChatUseCase, CreateRoomUseCase, GetRoomDetailUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    ListRoomsUseCase, PlaybackUseCase,
};

/// Shared application state: the use cases plus the delivery plumbing the
/// handlers drive directly (pusher registration, connection bookkeeping).
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub playback_usecase: Arc<PlaybackUseCase>,
    pub chat_usecase: Arc<ChatUseCase>,
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub message_pusher: Arc<dyn MessagePusher>,
    pub registry: Arc<ConnectionRegistry>,
}
