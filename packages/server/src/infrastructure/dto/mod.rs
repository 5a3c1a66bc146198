//! DTO 層
//!
//! 外部との境界（WebSocket / HTTP）で使うデータ型と、
//! ドメインモデルとの変換ロジック。

pub mod conversion;
pub mod http;
pub mod websocket;
