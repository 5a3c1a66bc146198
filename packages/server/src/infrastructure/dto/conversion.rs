//! Conversion logic between wire DTOs and domain entities.
//!
//! Inbound conversion is fallible: wire payloads are untrusted, and the
//! broker drops invalid ones silently rather than surfacing an error to
//! the sender.

use crate::domain::{
    ChatMessage, ClientId, MessageContent, Role, RoomId, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity (validating)
// ========================================

impl TryFrom<dto::ChatMessagePayload> for ChatMessage {
    type Error = ValueObjectError;

    fn try_from(payload: dto::ChatMessagePayload) -> Result<Self, Self::Error> {
        Ok(ChatMessage::new(
            RoomId::new(payload.chat_id)?,
            ClientId::new(payload.sender_id)?,
            payload.role.parse::<Role>()?,
            MessageContent::new(payload.message)?,
        ))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for dto::ChatMessagePayload {
    fn from(message: ChatMessage) -> Self {
        Self {
            chat_id: message.room_id.into_string(),
            sender_id: message.from.into_string(),
            message: message.content.into_string(),
            role: message.role.as_str().to_string(),
        }
    }
}
