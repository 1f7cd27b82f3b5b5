//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{create_room, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Watch-together session server.
///
/// Wraps the shared [`AppState`] and runs the axum service with graceful
/// shutdown.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    fn router(&self) -> Router {
        Router::new()
            // WebSocket session protocol
            .route("/ws", get(websocket_handler))
            // HTTP API
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `host:port` and serve until a shutdown signal arrives.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener. Binding to port 0 first lets
    /// integration tests discover the actual address.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let local_addr = listener.local_addr()?;
        tracing::info!("session server listening on {}", local_addr);
        tracing::info!("connect to: ws://{}/ws", local_addr);

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server shutdown complete");
        Ok(())
    }
}
