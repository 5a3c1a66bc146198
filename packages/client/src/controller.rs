//! Local session state and event production.
//!
//! The controller is a pure state machine: it never touches the network.
//! It decides which wire events to emit for user actions, and which
//! received events to surface, based on the locally tracked session. The
//! broker's registry remains the source of truth for membership; this
//! state is only the client's eventually-consistent view of it.

use aizuchi_server::domain::{Role, RoomCodeFactory};
use aizuchi_server::infrastructure::dto::websocket::{
    ChatMessagePayload, CloseChatPayload, JoinRoomPayload,
};

use crate::error::SessionError;

/// A chat message accepted into the local log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Sender identity
    pub sender_id: String,
    /// Sender's role, for attribution
    pub role: Role,
    /// Message text
    pub message: String,
}

/// The currently open session, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenSession {
    room_id: String,
    role: Role,
}

/// Client-side session controller.
///
/// At most one session is open at a time. Opening is rejected while a
/// session is open, so there is never an ambiguous half-switched state;
/// close first, then open the next room.
pub struct SessionController {
    sender_id: String,
    session: Option<OpenSession>,
    message_log: Vec<ReceivedMessage>,
}

impl SessionController {
    /// Create a controller with no open session.
    pub fn new(sender_id: String) -> Self {
        Self {
            sender_id,
            session: None,
            message_log: Vec::new(),
        }
    }

    /// This client's identity.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Whether a session is currently open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The open room's code, if any.
    pub fn room_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.room_id.as_str())
    }

    /// This client's role in the open session, if any.
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    /// Messages accepted while the session was open, in arrival order.
    pub fn message_log(&self) -> &[ReceivedMessage] {
        &self.message_log
    }

    /// Open a new room as creator.
    ///
    /// Generates a fresh room code locally and returns the `joinRoom`
    /// event to send. The session is considered open immediately; the
    /// broker creates the room when the event arrives.
    ///
    /// # Errors
    ///
    /// Fails if a session is already open.
    pub fn create_room(&mut self) -> Result<JoinRoomPayload, SessionError> {
        if let Some(open) = &self.session {
            return Err(SessionError::SessionAlreadyOpen(open.room_id.clone()));
        }

        // 生成されるコードは常に 6 文字の base-36 で、検証に失敗しない
        let room_id = RoomCodeFactory::generate().expect("generated room code is always valid");
        self.open(room_id.into_string(), Role::Creator);
        Ok(self.join_payload())
    }

    /// Join an existing room as receiver.
    ///
    /// Returns the `joinRoom` event to send. No confirmation is awaited;
    /// if the code matched no live room, the broker simply creates one
    /// and the peer never shows up.
    ///
    /// # Errors
    ///
    /// Fails if the code is blank or a session is already open.
    pub fn join_room(&mut self, room_code: &str) -> Result<JoinRoomPayload, SessionError> {
        let room_code = room_code.trim();
        if room_code.is_empty() {
            return Err(SessionError::BlankRoomCode);
        }
        if let Some(open) = &self.session {
            return Err(SessionError::SessionAlreadyOpen(open.room_id.clone()));
        }

        self.open(room_code.to_string(), Role::Receiver);
        Ok(self.join_payload())
    }

    /// Produce a `chatMessage` event for the given input.
    ///
    /// Blank input is not an error: it produces no event at all
    /// (`Ok(None)`), matching the blank-input policy everywhere else.
    ///
    /// # Errors
    ///
    /// Fails if no session is open.
    pub fn send_message(&self, text: &str) -> Result<Option<ChatMessagePayload>, SessionError> {
        let Some(open) = &self.session else {
            return Err(SessionError::SessionNotOpen);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(ChatMessagePayload {
            chat_id: open.room_id.clone(),
            sender_id: self.sender_id.clone(),
            message: text.to_string(),
            role: open.role.as_str().to_string(),
        }))
    }

    /// Accept a routed `message` event into the local log.
    ///
    /// Events that arrive while no session is open, or that are addressed
    /// to a different room, are ignored: after a local close the broker
    /// may still flush messages that were already in flight.
    pub fn on_message_received(&mut self, payload: ChatMessagePayload) -> Option<ReceivedMessage> {
        let open = self.session.as_ref()?;
        if open.room_id != payload.chat_id {
            return None;
        }
        let role = payload.role.parse::<Role>().ok()?;

        let received = ReceivedMessage {
            sender_id: payload.sender_id,
            role,
            message: payload.message,
        };
        self.message_log.push(received.clone());
        Some(received)
    }

    /// Close the open session.
    ///
    /// The local state is reset immediately (optimistic close); the
    /// returned `closeChat` event tells the broker to destroy the room.
    /// Returns `None` if no session is open, making close idempotent.
    pub fn close_chat(&mut self) -> Option<CloseChatPayload> {
        let open = self.session.take()?;
        self.message_log.clear();

        Some(CloseChatPayload {
            chat_id: open.room_id,
            sender_id: self.sender_id.clone(),
        })
    }

    /// The `joinRoom` event re-establishing the open session, if any.
    ///
    /// Used after a reconnect: membership is keyed by role slot, so
    /// re-sending the join restores the subscription.
    pub fn join_request(&self) -> Option<JoinRoomPayload> {
        self.session.as_ref().map(|_| self.join_payload())
    }

    fn open(&mut self, room_id: String, role: Role) {
        self.session = Some(OpenSession { room_id, role });
        self.message_log.clear();
    }

    fn join_payload(&self) -> JoinRoomPayload {
        // 呼び出し側で session が Some であることを保証している
        let open = self.session.as_ref().expect("session must be open");
        JoinRoomPayload {
            chat_id: open.room_id.clone(),
            sender_id: self.sender_id.clone(),
            role: open.role.as_str().to_string(),
        }
    }
}
