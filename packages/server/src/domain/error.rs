//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be blank")]
    ClientIdBlank,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("room code cannot be blank")]
    RoomIdBlank,

    /// RoomId too long error
    #[error("room code cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// Role parse error
    #[error("role must be 'creator' or 'receiver' (got: {0})")]
    RoleInvalid(String),

    /// MessageContent validation error
    #[error("message content cannot be blank")]
    MessageContentBlank,

    /// MessageContent too long error
    #[error("message content cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors related to pushing messages to connected clients
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The target client has no registered channel
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),

    /// Sending over the channel failed
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
