//! Message formatting utilities for client display.

use aizuchi_server::domain::Role;
use aizuchi_shared::time::timestamp_to_jst_rfc3339;

use crate::controller::ReceivedMessage;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a routed chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The message accepted into the log
    /// * `own_sender_id` - The current client's ID (to mark own echoes)
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_chat_message(
        message: &ReceivedMessage,
        own_sender_id: &str,
        received_at: i64,
    ) -> String {
        let me_suffix = if message.sender_id == own_sender_id {
            " (me)"
        } else {
            ""
        };
        let timestamp_str = timestamp_to_jst_rfc3339(received_at);
        format!(
            "\n\n------------------------------------------------------------\n\
             [{}] @{}{}: {}\n\
             received at {}\n\
             ------------------------------------------------------------\n",
            message.role, message.sender_id, me_suffix, message.message, timestamp_str
        )
    }

    /// Format the session-opened banner
    ///
    /// For creators, the banner includes the room code to share with the
    /// other party.
    pub fn format_session_opened(room_id: &str, role: Role) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        match role {
            Role::Creator => {
                output.push_str(&format!("Room '{}' opened.\n", room_id));
                output.push_str("Share this code with the other party so they can join.\n");
            }
            Role::Receiver => {
                output.push_str(&format!("Joined room '{}'.\n", room_id));
            }
        }
        output.push_str("============================================================\n");
        output
    }

    /// Format the session-closed notice
    pub fn format_session_closed(room_id: &str) -> String {
        format!("\nChat session for room '{}' closed.\n", room_id)
    }

    /// Format the command help shown at startup
    pub fn format_help() -> String {
        "\nCommands:\n\
         /create        open a new room and print its code\n\
         /join <code>   join an existing room\n\
         /close         close the current session\n\
         /quit          exit the client\n\
         Anything else is sent as a chat message.\n"
            .to_string()
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
