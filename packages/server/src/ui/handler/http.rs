//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::NewRoomMeta,
    infrastructure::dto::{
        conversion::{room_detail_dto, room_summary_dto},
        http::{CreateRoomRequest, CreateRoomResponse, ErrorResponse, RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
    usecase::{RoomDetailError, SessionError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List public rooms with their live occupancy
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_rooms_usecase.execute().await;
    let summaries = rooms
        .iter()
        .map(|(summary, occupancy)| room_summary_dto(summary, *occupancy))
        .collect();
    Json(summaries)
}

/// Create a durable room record; the live session starts on first join
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), (StatusCode, Json<ErrorResponse>)> {
    let meta = NewRoomMeta {
        name: request.name,
        owner_id: request.owner_id,
        is_public: request.is_public,
    };
    match state.create_room_usecase.execute(meta).await {
        Ok(room_id) => Ok((
            StatusCode::CREATED,
            Json(CreateRoomResponse {
                id: room_id.into_string(),
            }),
        )),
        Err(e @ SessionError::InvalidPayload(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok((meta, participants)) => Ok(Json(room_detail_dto(&meta, participants))),
        Err(RoomDetailError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(RoomDetailError::InvalidRoomId(_)) => Err(StatusCode::BAD_REQUEST),
    }
}
