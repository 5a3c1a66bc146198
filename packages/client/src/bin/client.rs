//! Chat client for two-party rooms with reconnection support.
//!
//! Connects to the room broker and drives a chat session from stdin.
//! Use `/create` to open a room (the code is printed for sharing) or
//! `/join <code>` to join one; other input is sent as chat messages.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval) and re-joins the open room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client
//! cargo run --bin client -- --sender-id alice
//! ```

use clap::Parser;
use uuid::Uuid;

use aizuchi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Chat client for two-party rooms", long_about = None)]
struct Args {
    /// Sender ID for identifying messages (defaults to a random UUID)
    #[arg(short = 's', long)]
    sender_id: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let sender_id = args
        .sender_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Run the client
    if let Err(e) = aizuchi_client::runner::run_client(args.url, sender_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
