//! InMemory RoomRegistry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ルーム間に共有される可変状態はこのマップだけであり、単一の Mutex で
//! 保護します。配送順序の保証はルーム単位（broker 到着順）のみで、
//! ルームを跨いだ全体順序は提供しません。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, JoinOutcome, Participant, ReleaseOutcome, Room, RoomId, RoomRegistry,
};

/// インメモリ RoomRegistry 実装
pub struct InMemoryRoomRegistry {
    /// ルームコードから Room へのマップ
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRegistry {
    /// 新しい空の InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: RoomId, participant: Participant) -> JoinOutcome {
        let mut rooms = self.rooms.lock().await;

        let room_created = !rooms.contains_key(&room_id);
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, participant.connected_at));
        let displaced = room.occupy(participant);

        JoinOutcome {
            room_created,
            displaced,
        }
    }

    async fn member_ids(&self, room_id: &RoomId) -> Option<Vec<ClientId>> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).map(|room| room.member_ids())
    }

    async fn find(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn close(&self, room_id: &RoomId) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_id)
    }

    async fn release(&self, client_id: &ClientId) -> ReleaseOutcome {
        let mut rooms = self.rooms.lock().await;

        // 1 接続で複数のルームに参加できるため、全てのルームを走査する
        let mut released_from = Vec::new();
        let mut destroyed = Vec::new();
        for (room_id, room) in rooms.iter_mut() {
            if room.release(client_id).is_some() {
                released_from.push(room_id.clone());
                if room.is_empty() {
                    destroyed.push(room_id.clone());
                }
            }
        }

        // 空になったルームは破棄する（マップのリーク防止）
        for room_id in &destroyed {
            rooms.remove(room_id);
        }

        ReleaseOutcome {
            released_from,
            destroyed,
        }
    }

    async fn list(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }
}
