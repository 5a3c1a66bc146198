//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Session state errors raised by the controller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Room code input was empty or whitespace-only
    #[error("Room code must not be blank")]
    BlankRoomCode,

    /// A session is already open; close it before opening another
    #[error("A chat session is already open (room '{0}')")]
    SessionAlreadyOpen(String),

    /// No session is open
    #[error("No chat session is open")]
    SessionNotOpen,
}
