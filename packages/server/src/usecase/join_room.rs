//! UseCase: ルーム参加処理
//!
//! joinRoom イベントを受けてルームメンバーシップを更新する。
//! ルームが存在しなければ作成し、同じ role の先客がいれば上書きする
//! （last writer wins）。

use std::sync::Arc;

use crate::domain::{JoinOutcome, Participant, RoomId, RoomRegistry};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（ルームメンバーシップの抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加先のルームコード（Domain Model）
    /// * `participant` - 参加者（Domain Model）
    ///
    /// # Returns
    ///
    /// * `JoinOutcome` - ルームが作成されたか、先客を上書きしたか
    pub async fn execute(&self, room_id: RoomId, participant: Participant) -> JoinOutcome {
        let sender_id = participant.id.clone();
        let role = participant.role;

        let outcome = self.registry.join(room_id.clone(), participant).await;

        if outcome.room_created {
            tracing::info!("Room created: room_id={}, creator={}", room_id, sender_id);
        }
        if let Some(displaced) = &outcome.displaced {
            // 正規の再 join と成りすましは区別できない。上書きを記録するのみ。
            tracing::warn!(
                "Role slot overwritten: room_id={}, role={}, displaced={}, by={}",
                room_id,
                role,
                displaced.id,
                sender_id
            );
        }
        tracing::info!(
            "Client joined room: room_id={}, sender_id={}, role={}",
            room_id,
            sender_id,
            role
        );

        outcome
    }
}
