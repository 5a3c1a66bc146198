//! UseCase 層のエラー定義
//!
//! ここでのエラーは送信者には返されない（best-effort）。UI 層はログに
//! 残してイベントを破棄するだけで、クライアントへの応答は行わない。

use thiserror::Error;

use crate::domain::RoomId;

/// メッセージ routing のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// 宛先のルームが存在しない（メッセージは破棄される）
    #[error("room '{0}' not found, message dropped")]
    RoomNotFound(RoomId),

    /// wire イベントのエンコードに失敗
    #[error("failed to encode message event: {0}")]
    Encode(String),

    /// ブロードキャストに失敗
    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(String),
}

/// ルーム close のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CloseError {
    /// 対象のルームが存在しない（close は no-op になる）
    #[error("room '{0}' not found, close ignored")]
    RoomNotFound(RoomId),
}
