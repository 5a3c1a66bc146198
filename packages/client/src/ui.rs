//! UI utilities for the client.

use std::io::Write;

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(sender_id: &str) {
    print!("{}> ", sender_id);
    std::io::stdout().flush().ok();
}
