//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{MessagePusher, RoomRegistry},
    usecase::{
        CloseChatUseCase, DisconnectParticipantUseCase, JoinRoomUseCase, RouteMessageUseCase,
    },
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the broker router over the given shared state.
///
/// Split out of [`Server::run`] so integration tests can serve the same
/// router on an ephemeral port.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Room broker server
///
/// This struct encapsulates the broker's dependencies and provides methods
/// to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(registry, message_pusher);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Registry（ルームメンバーシップの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `registry` - Room membership registry
    /// * `message_pusher` - Outbound message channel registry
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Build the shared application state, wiring usecases to dependencies.
    pub fn into_state(self) -> Arc<AppState> {
        Arc::new(AppState {
            join_room_usecase: Arc::new(JoinRoomUseCase::new(self.registry.clone())),
            route_message_usecase: Arc::new(RouteMessageUseCase::new(
                self.registry.clone(),
                self.message_pusher.clone(),
            )),
            close_chat_usecase: Arc::new(CloseChatUseCase::new(self.registry.clone())),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                self.registry.clone(),
                self.message_pusher.clone(),
            )),
            registry: self.registry,
            message_pusher: self.message_pusher,
        })
    }

    /// Run the room broker server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.into_state());

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Room broker server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
