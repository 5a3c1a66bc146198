//! Room broker server for two-party chat rooms.
//!
//! Accepts WebSocket connections, tracks room membership, and routes chat
//! messages to the current members of each room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use aizuchi_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry},
    ui::Server,
};
use aizuchi_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Room broker server for two-party chat rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. Server (wires the usecases internally)
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let server = Server::new(registry, message_pusher);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
