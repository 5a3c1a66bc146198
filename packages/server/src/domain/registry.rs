//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とするルームメンバーシップへのインターフェースを
//! 定義します。具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Registry はルームメンバーシップの唯一の真実の所有者です。クライアント
//! 側のセッション状態はここから導出される eventually-consistent なビューに
//! すぎません。

use async_trait::async_trait;

use super::{ClientId, Participant, Room, RoomId};

/// Result of joining a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Whether the room was created by this join
    pub room_created: bool,
    /// The prior occupant of the role slot, if the join overwrote one
    pub displaced: Option<Participant>,
}

/// Result of releasing a participant on disconnect.
///
/// One connection can have joined any number of rooms, so a disconnect
/// may release several slots at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Rooms the participant was released from
    pub released_from: Vec<RoomId>,
    /// Rooms destroyed because the release emptied them
    pub destroyed: Vec<RoomId>,
}

/// Room Registry trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しない。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ルームに参加する。ルームが存在しなければ作成する。
    ///
    /// 同じ role スロットの先客は上書きされる（last writer wins）。
    async fn join(&self, room_id: RoomId, participant: Participant) -> JoinOutcome;

    /// ルームの現在のメンバーのクライアント ID を取得（creator, receiver の順）
    ///
    /// ルームが存在しない場合は `None`。
    async fn member_ids(&self, room_id: &RoomId) -> Option<Vec<ClientId>>;

    /// ルームを取得
    async fn find(&self, room_id: &RoomId) -> Option<Room>;

    /// ルームとそのメンバーシップを破棄する
    ///
    /// 破棄されたルームを返す。存在しない場合は `None`。
    async fn close(&self, room_id: &RoomId) -> Option<Room>;

    /// 切断した参加者の role スロットを、参加している全てのルームで解放する
    ///
    /// 解放によって空になったルームは破棄される。
    async fn release(&self, client_id: &ClientId) -> ReleaseOutcome;

    /// 全てのルームを取得
    async fn list(&self) -> Vec<Room>;
}
