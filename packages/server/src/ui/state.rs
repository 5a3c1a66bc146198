//! Server state and connection management.

use std::sync::Arc;

use crate::{
    domain::{MessagePusher, RoomRegistry},
    usecase::{
        CloseChatUseCase, DisconnectParticipantUseCase, JoinRoomUseCase, RouteMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RouteMessageUseCase（メッセージ routing のユースケース）
    pub route_message_usecase: Arc<RouteMessageUseCase>,
    /// CloseChatUseCase（ルーム close のユースケース）
    pub close_chat_usecase: Arc<CloseChatUseCase>,
    /// DisconnectParticipantUseCase（切断処理のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// Registry（HTTP エンドポイントの読み取り用）
    pub registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（送信チャンネルの登録用）
    pub message_pusher: Arc<dyn MessagePusher>,
}
