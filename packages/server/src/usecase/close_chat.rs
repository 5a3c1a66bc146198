//! UseCase: ルーム close 処理
//!
//! closeChat イベントを受けてルームとそのメンバーシップを破棄する。
//! どちらの参加者でも close を要求でき、認可チェックは行わない。
//! （参加できた時点でルームコードを知っている = 対称的な権限を持つ）

use std::sync::Arc;

use crate::domain::{ClientId, Room, RoomId, RoomRegistry};

use super::error::CloseError;

/// ルーム close のユースケース
pub struct CloseChatUseCase {
    /// Registry（ルームメンバーシップの抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl CloseChatUseCase {
    /// 新しい CloseChatUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム close を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 破棄するルームコード（Domain Model）
    /// * `requested_by` - close を要求したクライアント ID（ログ用）
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 破棄されたルーム
    /// * `Err(CloseError)` - ルームが存在しない（close は no-op）
    pub async fn execute(
        &self,
        room_id: RoomId,
        requested_by: ClientId,
    ) -> Result<Room, CloseError> {
        let Some(room) = self.registry.close(&room_id).await else {
            return Err(CloseError::RoomNotFound(room_id));
        };

        tracing::info!(
            "Room closed: room_id={}, requested_by={}, members={}",
            room_id,
            requested_by,
            room.member_ids().len()
        );

        Ok(room)
    }
}
