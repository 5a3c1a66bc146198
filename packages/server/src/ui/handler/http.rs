//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{Room, RoomId},
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};
use aizuchi_shared::time::timestamp_to_jst_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.list().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            members: room
                .member_ids()
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.registry.find(&room_id).await {
        Some(room) => Ok(Json(to_room_detail(room))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Domain Model から DTO への変換
fn to_room_detail(room: Room) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: room
            .members()
            .into_iter()
            .map(|p| MemberDetailDto {
                sender_id: p.id.as_str().to_string(),
                role: p.role.as_str().to_string(),
                connected_at: timestamp_to_jst_rfc3339(p.connected_at.value()),
            })
            .collect(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    }
}
