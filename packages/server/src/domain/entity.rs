//! Core domain models for the room broker.

use serde::{Deserialize, Serialize};

use super::value_object::{ClientId, MessageContent, Role, RoomId, Timestamp};

/// A two-party chat room.
///
/// A room holds at most one participant per role. It is created implicitly
/// when the first participant joins and destroyed on close or when the last
/// participant disconnects. Messages are never stored on the room; they only
/// exist in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room code
    pub id: RoomId,
    /// Occupant of the creator slot
    pub creator: Option<Participant>,
    /// Occupant of the receiver slot
    pub receiver: Option<Participant>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room with the given code and creation timestamp
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            creator: None,
            receiver: None,
            created_at,
        }
    }

    /// Occupy the participant's role slot.
    ///
    /// A prior occupant of the same role is overwritten (last writer wins;
    /// nothing distinguishes a legitimate re-join from impersonation) and
    /// returned so the caller can log the displacement.
    pub fn occupy(&mut self, participant: Participant) -> Option<Participant> {
        let slot = match participant.role {
            Role::Creator => &mut self.creator,
            Role::Receiver => &mut self.receiver,
        };
        slot.replace(participant)
    }

    /// Get the occupant of a role slot.
    pub fn slot(&self, role: Role) -> Option<&Participant> {
        match role {
            Role::Creator => self.creator.as_ref(),
            Role::Receiver => self.receiver.as_ref(),
        }
    }

    /// Release whichever slot the given participant occupies.
    ///
    /// Returns the removed participant, or `None` if they are not a member.
    pub fn release(&mut self, client_id: &ClientId) -> Option<Participant> {
        for slot in [&mut self.creator, &mut self.receiver] {
            if slot.as_ref().is_some_and(|p| &p.id == client_id) {
                return slot.take();
            }
        }
        None
    }

    /// Check whether the given participant occupies either slot.
    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.members().iter().any(|p| &p.id == client_id)
    }

    /// Get the current members of the room (creator first).
    pub fn members(&self) -> Vec<&Participant> {
        self.creator.iter().chain(self.receiver.iter()).collect()
    }

    /// Get the client ids of the current members (creator first).
    pub fn member_ids(&self) -> Vec<ClientId> {
        self.members().into_iter().map(|p| p.id.clone()).collect()
    }

    /// Check whether both slots are empty.
    pub fn is_empty(&self) -> bool {
        self.creator.is_none() && self.receiver.is_none()
    }
}

/// A participant occupying one role slot of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Sender identifier
    pub id: ClientId,
    /// Fixed role within the room
    pub role: Role,
    /// Timestamp when the participant joined
    pub connected_at: Timestamp,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: ClientId, role: Role, connected_at: Timestamp) -> Self {
        Self {
            id,
            role,
            connected_at,
        }
    }
}

/// A chat message in transit.
///
/// Immutable once built; exists only between validation at the wire
/// boundary and fan-out to room members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Room the message is addressed to
    pub room_id: RoomId,
    /// Sender identifier
    pub from: ClientId,
    /// Sender's role, carried for attribution on the receiving side
    pub role: Role,
    /// Message content
    pub content: MessageContent,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(room_id: RoomId, from: ClientId, role: Role, content: MessageContent) -> Self {
        Self {
            room_id,
            from,
            role,
            content,
        }
    }
}
