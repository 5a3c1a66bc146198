//! WebSocket connection handlers.
//!
//! One connection carries one client identity, announced via the
//! `sender_id` query parameter. Events on the connection are parsed and
//! dispatched to the usecases; malformed or invalid events are logged and
//! dropped without any response to the sender (best-effort semantics).

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, ClientId, Participant, Role, RoomId, Timestamp},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::error::{CloseError, RouteError},
};
use aizuchi_shared::time::get_jst_timestamp;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub sender_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::new(query.sender_id.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid sender_id '{}': {}", query.sender_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this client to receive routed messages
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(client_id.clone(), tx.clone())
        .await;

    tracing::info!("Client '{}' connected and registered", client_id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, tx, rx)))
}

/// Spawns a task that receives routed messages from the rx channel and
/// pushes them to the WebSocket sender.
///
/// Channel order is preserved, so per-room FIFO delivery established by the
/// usecase carries through to the wire.
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

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let client_id_clone = client_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&state_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward routed messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 接続終了時は正常・異常を問わず同じ後始末を行う。
    // tx は所有確認に使われ、同じ client_id で再接続された後の古い接続の
    // 後始末が新しい接続の購読を奪わないようにする。
    state
        .disconnect_participant_usecase
        .execute(&client_id, &tx)
        .await;
}

/// Parse one inbound event and dispatch it to the matching usecase.
///
/// Errors never propagate back to the sender; they are logged and the
/// event is dropped.
async fn dispatch_event(state: &Arc<AppState>, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event, dropped: {} ({})", text, e);
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom(payload) => {
            // Convert String -> Domain Models
            let parsed = RoomId::new(payload.chat_id.clone()).and_then(|room_id| {
                let sender_id = ClientId::new(payload.sender_id.clone())?;
                let role = payload.role.parse::<Role>()?;
                Ok((room_id, sender_id, role))
            });
            let (room_id, sender_id, role) = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Invalid joinRoom payload, dropped: {}", e);
                    return;
                }
            };

            let participant =
                Participant::new(sender_id, role, Timestamp::new(get_jst_timestamp()));
            state.join_room_usecase.execute(room_id, participant).await;
        }
        ClientEvent::ChatMessage(payload) => {
            let message = match ChatMessage::try_from(payload) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Invalid chatMessage payload, dropped: {}", e);
                    return;
                }
            };

            match state.route_message_usecase.execute(message).await {
                Ok(_targets) => {
                    // Broadcast is handled by UseCase
                }
                Err(RouteError::RoomNotFound(room_id)) => {
                    tracing::warn!("Message to unknown room '{}' dropped", room_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to route message: {}", e);
                }
            }
        }
        ClientEvent::CloseChat(payload) => {
            let parsed = RoomId::new(payload.chat_id.clone())
                .and_then(|room_id| Ok((room_id, ClientId::new(payload.sender_id.clone())?)));
            let (room_id, sender_id) = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Invalid closeChat payload, dropped: {}", e);
                    return;
                }
            };

            match state.close_chat_usecase.execute(room_id, sender_id).await {
                Ok(_room) => {}
                Err(CloseError::RoomNotFound(room_id)) => {
                    tracing::warn!("Close for unknown room '{}' ignored", room_id);
                }
            }
        }
    }
}
