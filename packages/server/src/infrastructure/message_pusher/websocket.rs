//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に
//! 使用します。これにより「WebSocket の生成」と「メッセージの送信」が
//! 分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: client_id (String)
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(client_id.as_str().to_string(), sender);
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
    }

    async fn unregister_client(&self, client_id: &ClientId, channel: &PusherChannel) -> bool {
        let mut clients = self.clients.lock().await;
        match clients.get(client_id.as_str()) {
            // 同じ client_id の新しい接続が登録済み: 古い接続の後始末なので触らない
            Some(current) if !current.same_channel(channel) => {
                tracing::debug!(
                    "Stale unregister for client '{}' skipped (channel superseded)",
                    client_id
                );
                false
            }
            Some(_) => {
                clients.remove(client_id.as_str());
                tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
                true
            }
            None => true,
        }
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(client_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to client '{}'", client_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to client '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to client '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Client '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn client_id(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(client_id("user-a"), tx).await;

        // when (操作):
        let result = pusher.push_to(&client_id("user-a"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&client_id("nonexistent"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // テスト項目: 複数のクライアントにメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(client_id("user-a"), tx1).await;
        pusher.register_client(client_id("user-b"), tx2).await;

        // when (操作):
        let targets = vec![client_id("user-a"), client_id("user-b")];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure_is_tolerated() {
        // テスト項目: ブロードキャスト時、一部のクライアントが存在しなくても成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        pusher.register_client(client_id("user-a"), tx1).await;

        // when (操作):
        let targets = vec![client_id("user-a"), client_id("nonexistent")];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果): ブロードキャストは部分失敗を許容
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_client_stops_delivery() {
        // テスト項目: 登録解除後のクライアントには配送されない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(client_id("user-a"), tx.clone()).await;

        // when (操作):
        let owned = pusher.unregister_client(&client_id("user-a"), &tx).await;
        let result = pusher.push_to(&client_id("user-a"), "Hello").await;

        // then (期待する結果):
        assert!(owned);
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_unregister_with_stale_channel_keeps_new_registration() {
        // テスト項目: 同じ client_id の再接続後、古い接続の登録解除は
        //             新しいチャンネルを削除しない
        // given (前提条件): user-a の古いチャンネルが新しいチャンネルに上書きされている
        let pusher = WebSocketMessagePusher::new();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        pusher.register_client(client_id("user-a"), old_tx.clone()).await;
        pusher.register_client(client_id("user-a"), new_tx).await;

        // when (操作): 古い接続の後始末が登録解除を試みる
        let owned = pusher.unregister_client(&client_id("user-a"), &old_tx).await;

        // then (期待する結果): 新しいチャンネルへの配送は生きている
        assert!(!owned);
        assert!(pusher.push_to(&client_id("user-a"), "Hello").await.is_ok());
        assert_eq!(new_rx.recv().await, Some("Hello".to_string()));
    }
}
