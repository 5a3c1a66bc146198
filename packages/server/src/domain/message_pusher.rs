//! MessagePusher trait 定義
//!
//! 接続中のクライアントへメッセージを送り出すためのインターフェース。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, error::MessagePushError};

/// クライアントへの送信チャンネル
///
/// 1 接続ごとに WebSocket 送信タスクへ繋がる unbounded チャンネル。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    ///
    /// 同じ client_id が登録済みの場合は上書きされる（古い接続のチャンネルは
    /// drop され、その接続の送信ループが終了する）。
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    ///
    /// `channel` が現在登録されているチャンネルと同一の場合のみ解除する。
    /// 同じ client_id の新しい接続に上書きされた後の、古い接続の後始末では
    /// `false` を返す。呼び出し側はその場合メンバーシップに触れてはならない。
    async fn unregister_client(&self, client_id: &ClientId, channel: &PusherChannel) -> bool;

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージをブロードキャスト
    ///
    /// 一部の送信失敗は許容される（best-effort）。
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
