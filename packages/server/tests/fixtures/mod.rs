//! Shared fixtures for integration tests.
//!
//! Serves the broker router in-process on an ephemeral port, so tests
//! never depend on a fixed port or an external process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aizuchi_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry},
    ui::{Server, build_router},
};

/// In-process broker instance for one test
pub struct TestServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a broker on an ephemeral port
    pub async fn start() -> Self {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let app = build_router(Server::new(registry, message_pusher).into_state());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        TestServer { addr, handle }
    }

    /// Base URL for HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL for the given sender
    pub fn ws_url(&self, sender_id: &str) -> String {
        format!("ws://{}/ws?sender_id={}", self.addr, sender_id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Poll the room detail endpoint until the room has `expected` members.
///
/// Gives up after about 2 seconds.
pub async fn wait_for_members(base_url: &str, room_id: &str, expected: usize) {
    let client = reqwest::Client::new();
    for _ in 0..40 {
        if let Ok(response) = client
            .get(format!("{}/api/rooms/{}", base_url, room_id))
            .send()
            .await
            && response.status() == 200
            && let Ok(body) = response.json::<serde_json::Value>().await
            && body["members"].as_array().is_some_and(|m| m.len() == expected)
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "Room '{}' did not reach {} members in time",
        room_id, expected
    );
}
