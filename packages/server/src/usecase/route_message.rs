//! UseCase: メッセージ routing 処理
//!
//! chatMessage イベントを受けて、宛先ルームの現在のメンバー全員
//! （送信者自身を含む）に message イベントをブロードキャストする。
//! 宛先ルームが存在しない場合、メッセージは黙って破棄される。

use std::sync::Arc;

use crate::domain::{ChatMessage, ClientId, MessagePusher, RoomRegistry};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::RouteError;

/// メッセージ routing のユースケース
pub struct RouteMessageUseCase {
    /// Registry（ルームメンバーシップの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RouteMessageUseCase {
    /// 新しい RouteMessageUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// メッセージ routing を実行
    ///
    /// # Arguments
    ///
    /// * `message` - 検証済みのチャットメッセージ（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ClientId>)` - ブロードキャスト対象のクライアント ID リスト
    ///   （送信者自身を含む）
    /// * `Err(RouteError)` - ルーム不在またはブロードキャスト失敗
    pub async fn execute(&self, message: ChatMessage) -> Result<Vec<ClientId>, RouteError> {
        // 1. 宛先ルームの現在のメンバーを取得
        let Some(targets) = self.registry.member_ids(&message.room_id).await else {
            return Err(RouteError::RoomNotFound(message.room_id));
        };

        // 2. wire イベントにエンコード（ファンアウト前に一度だけ）
        let event = ServerEvent::Message(message.clone().into());
        let json_message =
            serde_json::to_string(&event).map_err(|e| RouteError::Encode(e.to_string()))?;

        // 3. 送信者自身を含むメンバー全員にブロードキャスト
        //    （送信者のエコーバックが配信順序の確認になる）
        self.message_pusher
            .broadcast(targets.clone(), &json_message)
            .await
            .map_err(|e| RouteError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Message routed: room_id={}, from={}, targets={}",
            message.room_id,
            message.from,
            targets.len()
        );

        Ok(targets)
    }
}
