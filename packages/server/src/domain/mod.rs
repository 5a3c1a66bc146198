//! Domain 層
//!
//! ルームとメンバーシップのドメインモデル、および Infrastructure 層が
//! 実装するインターフェース（RoomRegistry, MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod registry;
pub mod value_object;

pub use entity::{ChatMessage, Participant, Room};
pub use error::{MessagePushError, ValueObjectError};
pub use factory::RoomCodeFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{JoinOutcome, ReleaseOutcome, RoomRegistry};
pub use value_object::{ClientId, MessageContent, Role, RoomId, Timestamp};
