//! WebSocket connection handler: the session protocol endpoint.
//!
//! One connection maps to one [`ConnectionId`], allocated on upgrade. Two
//! tasks run per connection: a receive loop that parses and dispatches
//! client events, and a pusher loop that drains the connection's outbound
//! channel into the socket. Either task ending tears down the other, and the
//! disconnect path then feeds a synthetic leave through the same use case an
//! explicit leave uses.
//!
//! Fan-out happens inside the use cases, under the room's critical section;
//! this layer only parses inbound frames and answers the sender's own
//! errors.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MediaRef, PlayerCommand, PositionSeconds},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::SessionError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

fn error_event(error: &SessionError) -> ServerEvent {
    let code = match error {
        SessionError::NotInRoom => "not-in-room",
        SessionError::InvalidPayload(_) => "invalid-payload",
    };
    ServerEvent::Error {
        code: code.to_string(),
        message: error.to_string(),
    }
}

/// Drains the connection's outbound channel into the socket, preserving the
/// order messages were produced in.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_connection(connection_id, tx);
    state.registry.register(connection_id).await;
    tracing::info!(connection_id = %connection_id, "connection opened");

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "websocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&recv_state, connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_id, "client requested close");
                    break;
                }
                // Ping/pong is answered by the protocol layer
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect is a synthetic leave through the same path as the explicit
    // event; a connection that was not in a room owes nobody a notice.
    match state.leave_room_usecase.execute(connection_id).await {
        Ok(_) | Err(SessionError::NotInRoom) => {}
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "disconnect cleanup failed");
        }
    }
    state.registry.unregister(&connection_id).await;
    state.message_pusher.unregister_connection(&connection_id);
    tracing::info!(connection_id = %connection_id, "connection closed");
}

async fn handle_text(state: &Arc<AppState>, connection_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, "unparseable event: {}", e);
            let error = SessionError::InvalidPayload(e.to_string());
            send_error(state, &connection_id, &error);
            return;
        }
    };

    let result = match event {
        ClientEvent::JoinRoom {
            room_id,
            token,
            display_name,
        } => state
            .join_room_usecase
            .execute(connection_id, room_id, token, display_name)
            .await
            .map(|_| ()),
        ClientEvent::Leave => state
            .leave_room_usecase
            .execute(connection_id)
            .await
            .map(|_| ()),
        ClientEvent::Play { position_seconds } => {
            handle_playback(state, connection_id, play_command(position_seconds)).await
        }
        ClientEvent::Pause { position_seconds } => {
            handle_playback(state, connection_id, pause_command(position_seconds)).await
        }
        ClientEvent::Seek { position_seconds } => {
            handle_playback(state, connection_id, seek_command(position_seconds)).await
        }
        ClientEvent::ChangeMedia { media_ref } => {
            handle_playback(state, connection_id, change_media_command(media_ref)).await
        }
        ClientEvent::Chat { text } => state
            .chat_usecase
            .execute(connection_id, text)
            .await
            .map(|_| ()),
    };

    if let Err(error) = result {
        send_error(state, &connection_id, &error);
    }
}

fn play_command(position_seconds: f64) -> Result<PlayerCommand, SessionError> {
    Ok(PlayerCommand::Play(PositionSeconds::new(position_seconds)?))
}

fn pause_command(position_seconds: f64) -> Result<PlayerCommand, SessionError> {
    Ok(PlayerCommand::Pause(PositionSeconds::new(position_seconds)?))
}

fn seek_command(position_seconds: f64) -> Result<PlayerCommand, SessionError> {
    Ok(PlayerCommand::Seek(PositionSeconds::new(position_seconds)?))
}

fn change_media_command(media_ref: String) -> Result<PlayerCommand, SessionError> {
    Ok(PlayerCommand::ChangeMedia(MediaRef::new(media_ref)?))
}

async fn handle_playback(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    command: Result<PlayerCommand, SessionError>,
) -> Result<(), SessionError> {
    state
        .playback_usecase
        .execute(connection_id, command?)
        .await
        .map(|_| ())
}

/// Errors go only to the connection whose event failed, never to the room.
fn send_error(state: &Arc<AppState>, connection_id: &ConnectionId, error: &SessionError) {
    if let Some(json) = error_event(error).encode() {
        if let Err(e) = state.message_pusher.push_to(connection_id, &json) {
            tracing::debug!(connection_id = %connection_id, error = %e, "failed to deliver error event");
        }
    }
}
