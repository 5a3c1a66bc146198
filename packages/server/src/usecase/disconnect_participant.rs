//! UseCase: 切断処理
//!
//! WebSocket 接続の終了（正常・異常どちらも）を受けて、送信チャンネルの
//! 登録解除と role スロットの解放を行う。解放によって空になったルームは
//! 破棄される。
//!
//! 同じ client_id で再接続されると古い接続のチャンネルは上書きで drop され、
//! 古い接続の後始末がここに届く。その後始末が新しい接続のチャンネルや
//! メンバーシップを壊さないよう、チャンネルの所有確認に失敗した切断は
//! no-op となる。

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, PusherChannel, ReleaseOutcome, RoomRegistry};

/// 切断処理のユースケース
pub struct DisconnectParticipantUseCase {
    /// Registry（ルームメンバーシップの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 切断したクライアントの ID（Domain Model）
    /// * `channel` - 切断した接続の送信チャンネル（所有確認用）
    ///
    /// # Returns
    ///
    /// * `ReleaseOutcome` - 解放されたルームと、破棄されたルーム
    pub async fn execute(&self, client_id: &ClientId, channel: &PusherChannel) -> ReleaseOutcome {
        // 1. 送信チャンネルを登録解除（以降のブロードキャスト対象から外れる）
        //    新しい接続に上書きされた後の古い接続なら、ここで打ち切る
        let owned = self.message_pusher.unregister_client(client_id, channel).await;
        if !owned {
            tracing::info!(
                "Stale connection teardown for '{}', membership left intact",
                client_id
            );
            return ReleaseOutcome {
                released_from: Vec::new(),
                destroyed: Vec::new(),
            };
        }

        // 2. role スロットを全てのルームで解放（空になったルームは破棄される）
        let outcome = self.registry.release(client_id).await;

        if outcome.released_from.is_empty() {
            tracing::info!("Client disconnected (no room membership): {}", client_id);
        }
        for room_id in &outcome.released_from {
            if outcome.destroyed.contains(room_id) {
                tracing::info!(
                    "Client disconnected, room destroyed: room_id={}, client_id={}",
                    room_id,
                    client_id
                );
            } else {
                tracing::info!(
                    "Client disconnected, slot released: room_id={}, client_id={}",
                    room_id,
                    client_id
                );
            }
        }

        outcome
    }
}
