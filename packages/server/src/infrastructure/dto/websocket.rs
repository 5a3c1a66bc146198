//! WebSocket wire events for the chat protocol.
//!
//! All events are JSON with an internal `"type"` tag. Field names are
//! camelCase on the wire. Payload values are plain strings here; validation
//! into domain value objects happens at the handler boundary, and invalid
//! payloads are dropped silently (best-effort semantics).

use serde::{Deserialize, Serialize};

/// Events sent from a client to the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Register the sender in a room, creating the room if absent
    JoinRoom(JoinRoomPayload),
    /// Broadcast a message to the members of a room
    ChatMessage(ChatMessagePayload),
    /// Destroy a room and its membership
    CloseChat(CloseChatPayload),
}

/// Events sent from the broker to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A chat message delivered to all current room subscribers
    Message(ChatMessagePayload),
}

/// Payload of a `joinRoom` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    /// Room code
    pub chat_id: String,
    /// Sender identity
    pub sender_id: String,
    /// "creator" or "receiver"
    pub role: String,
}

/// Payload of a `chatMessage` / `message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    /// Room code
    pub chat_id: String,
    /// Sender identity
    pub sender_id: String,
    /// Message text
    pub message: String,
    /// Sender's role, carried for attribution
    pub role: String,
}

/// Payload of a `closeChat` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseChatPayload {
    /// Room code
    pub chat_id: String,
    /// Sender identity
    pub sender_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_join_room_wire_format() {
        // テスト項目: joinRoom イベントが camelCase タグ付き JSON で往復する
        // given (前提条件):
        let json = r#"{"type":"joinRoom","chatId":"ab12cd","senderId":"user-a","role":"creator"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        let ClientEvent::JoinRoom(payload) = &event else {
            panic!("expected joinRoom event");
        };
        assert_eq!(payload.chat_id, "ab12cd");
        assert_eq!(payload.sender_id, "user-a");
        assert_eq!(payload.role, "creator");

        let round_trip = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<ClientEvent>(&round_trip).unwrap(), event);
    }

    #[test]
    fn test_client_event_chat_message_wire_format() {
        // テスト項目: chatMessage イベントが正しくパースされる
        // given (前提条件):
        let json = r#"{"type":"chatMessage","chatId":"ab12cd","senderId":"user-a","message":"hi","role":"creator"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        let ClientEvent::ChatMessage(payload) = event else {
            panic!("expected chatMessage event");
        };
        assert_eq!(payload.message, "hi");
        assert_eq!(payload.role, "creator");
    }

    #[test]
    fn test_client_event_close_chat_wire_format() {
        // テスト項目: closeChat イベントが正しくパースされる
        // given (前提条件):
        let json = r#"{"type":"closeChat","chatId":"ab12cd","senderId":"user-a"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::CloseChat(CloseChatPayload {
                chat_id: "ab12cd".to_string(),
                sender_id: "user-a".to_string(),
            })
        );
    }

    #[test]
    fn test_server_event_message_wire_format() {
        // テスト項目: broker→client の message イベントのタグが "message" になる
        // given (前提条件):
        let event = ServerEvent::Message(ChatMessagePayload {
            chat_id: "ab12cd".to_string(),
            sender_id: "user-a".to_string(),
            message: "hi".to_string(),
            role: "creator".to_string(),
        });

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["chatId"], "ab12cd");
        assert_eq!(value["senderId"], "user-a");
        assert_eq!(value["message"], "hi");
        assert_eq!(value["role"], "creator");
    }

    #[test]
    fn test_unknown_event_type_fails_to_parse() {
        // テスト項目: 未知のイベント type はパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"unknownEvent","chatId":"ab12cd"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
