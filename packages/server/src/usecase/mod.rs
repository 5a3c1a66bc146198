//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod close_chat;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod route_message;

pub use close_chat::CloseChatUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{CloseError, RouteError};
pub use join_room::JoinRoomUseCase;
pub use route_message::RouteMessageUseCase;
