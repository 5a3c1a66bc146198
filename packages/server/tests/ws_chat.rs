//! WebSocket end-to-end tests for the room broker.
//!
//! Each test serves the broker in-process and drives it with raw
//! tokio-tungstenite connections, asserting on the actual wire traffic.

mod fixtures;
use fixtures::{TestServer, wait_for_members};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use aizuchi_server::infrastructure::dto::websocket::{
    ChatMessagePayload, ClientEvent, CloseChatPayload, JoinRoomPayload, ServerEvent,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(server: &TestServer, sender_id: &str) -> WsStream {
    let (ws, _) = connect_async(server.ws_url(sender_id))
        .await
        .expect("Failed to connect");
    ws
}

async fn send_event(ws: &mut WsStream, event: ClientEvent) {
    let json = serde_json::to_string(&event).expect("Failed to serialize event");
    ws.send(Message::Text(json.into()))
        .await
        .expect("Failed to send event");
}

/// Receive the next routed message, failing the test after 2 seconds.
async fn recv_message(ws: &mut WsStream) -> ChatMessagePayload {
    let deadline = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(frame) = ws.next().await {
            if let Ok(Message::Text(text)) = frame {
                let event: ServerEvent =
                    serde_json::from_str(&text).expect("Failed to parse server event");
                let ServerEvent::Message(payload) = event;
                return payload;
            }
        }
        panic!("Connection closed while waiting for a message");
    });
    deadline.await.expect("Timed out waiting for a message")
}

/// Assert that no routed message arrives within 300ms.
async fn recv_nothing(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(300), async {
        while let Some(frame) = ws.next().await {
            if let Ok(Message::Text(text)) = frame {
                return text.to_string();
            }
        }
        // 接続が閉じたのは「何も配信されない」扱い
        String::new()
    })
    .await;

    if let Ok(text) = result
        && !text.is_empty()
    {
        panic!("Expected no message, but received: {}", text);
    }
}

fn join_event(chat_id: &str, sender_id: &str, role: &str) -> ClientEvent {
    ClientEvent::JoinRoom(JoinRoomPayload {
        chat_id: chat_id.to_string(),
        sender_id: sender_id.to_string(),
        role: role.to_string(),
    })
}

fn chat_event(chat_id: &str, sender_id: &str, message: &str, role: &str) -> ClientEvent {
    ClientEvent::ChatMessage(ChatMessagePayload {
        chat_id: chat_id.to_string(),
        sender_id: sender_id.to_string(),
        message: message.to_string(),
        role: role.to_string(),
    })
}

fn close_event(chat_id: &str, sender_id: &str) -> ClientEvent {
    ClientEvent::CloseChat(CloseChatPayload {
        chat_id: chat_id.to_string(),
        sender_id: sender_id.to_string(),
    })
}

#[tokio::test]
async fn test_two_party_message_exchange() {
    // テスト項目: 2者間のメッセージ交換（送信者へのエコーバック込み）が成立する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;

    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    send_event(&mut bob, join_event("ab12cd", "bob", "receiver")).await;
    wait_for_members(&server.base_url(), "ab12cd", 2).await;

    // when (操作): alice が送信
    send_event(&mut alice, chat_event("ab12cd", "alice", "hi", "creator")).await;

    // then (期待する結果): 両方に同じメッセージが届く
    let to_alice = recv_message(&mut alice).await;
    let to_bob = recv_message(&mut bob).await;
    assert_eq!(to_alice.message, "hi");
    assert_eq!(to_alice.sender_id, "alice");
    assert_eq!(to_alice.role, "creator");
    assert_eq!(to_bob.message, "hi");

    // when (操作): bob が返信
    send_event(&mut bob, chat_event("ab12cd", "bob", "yo", "receiver")).await;

    // then (期待する結果): 送信順が配信順として保たれる
    let reply_to_alice = recv_message(&mut alice).await;
    let reply_to_bob = recv_message(&mut bob).await;
    assert_eq!(reply_to_alice.message, "yo");
    assert_eq!(reply_to_alice.role, "receiver");
    assert_eq!(reply_to_bob.message, "yo");
}

#[tokio::test]
async fn test_sender_alone_receives_own_echo() {
    // テスト項目: 相手不在のルームでも送信者自身にはエコーバックされる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    wait_for_members(&server.base_url(), "ab12cd", 1).await;

    // when (操作):
    send_event(&mut alice, chat_event("ab12cd", "alice", "anyone?", "creator")).await;

    // then (期待する結果):
    let echo = recv_message(&mut alice).await;
    assert_eq!(echo.message, "anyone?");
    assert_eq!(echo.sender_id, "alice");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: 別ルームのメッセージが漏れない
    // given (前提条件): 2つのルームにそれぞれ参加者がいる
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;
    let mut carol = connect(&server, "carol").await;

    send_event(&mut alice, join_event("room-1", "alice", "creator")).await;
    send_event(&mut bob, join_event("room-1", "bob", "receiver")).await;
    send_event(&mut carol, join_event("room-2", "carol", "creator")).await;
    wait_for_members(&server.base_url(), "room-1", 2).await;
    wait_for_members(&server.base_url(), "room-2", 1).await;

    // when (操作): room-1 でメッセージを送信
    send_event(&mut alice, chat_event("room-1", "alice", "secret", "creator")).await;

    // then (期待する結果): room-1 のメンバーにだけ届く
    assert_eq!(recv_message(&mut bob).await.message, "secret");
    recv_nothing(&mut carol).await;
}

#[tokio::test]
async fn test_message_to_unknown_room_is_dropped() {
    // テスト項目: 存在しないルーム宛のメッセージは黙って破棄される
    // given (前提条件): 送信者はどのルームにも参加していない
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;

    // when (操作):
    send_event(&mut alice, chat_event("zz99zz", "alice", "hello?", "creator")).await;

    // then (期待する結果): 応答もエラーも返らない
    recv_nothing(&mut alice).await;
}

#[tokio::test]
async fn test_blank_message_is_dropped() {
    // テスト項目: 空白のみのメッセージは配信されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    send_event(&mut bob, join_event("ab12cd", "bob", "receiver")).await;
    wait_for_members(&server.base_url(), "ab12cd", 2).await;

    // when (操作):
    send_event(&mut alice, chat_event("ab12cd", "alice", "   ", "creator")).await;

    // then (期待する結果): 誰にも届かない
    recv_nothing(&mut bob).await;
    recv_nothing(&mut alice).await;
}

#[tokio::test]
async fn test_malformed_event_is_dropped_and_connection_survives() {
    // テスト項目: 不正なイベントは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    wait_for_members(&server.base_url(), "ab12cd", 1).await;

    // when (操作): JSON ですらないフレームを送る
    alice
        .send(Message::Text("not json at all".into()))
        .await
        .expect("Failed to send frame");

    // then (期待する結果): 接続は生きていて、以降のメッセージは届く
    send_event(&mut alice, chat_event("ab12cd", "alice", "still here", "creator")).await;
    assert_eq!(recv_message(&mut alice).await.message, "still here");
}

#[tokio::test]
async fn test_close_destroys_room_and_stops_delivery() {
    // テスト項目: どちらの参加者の close でもルームが破棄され、以降の配信が止まる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    send_event(&mut bob, join_event("ab12cd", "bob", "receiver")).await;
    wait_for_members(&server.base_url(), "ab12cd", 2).await;

    // when (操作): receiver 側が close を要求
    send_event(&mut bob, close_event("ab12cd", "bob")).await;
    wait_for_room_gone(&server.base_url(), "ab12cd").await;

    // then (期待する結果): 破棄後のメッセージはどちらにも届かない
    send_event(&mut alice, chat_event("ab12cd", "alice", "too late", "creator")).await;
    recv_nothing(&mut alice).await;
    recv_nothing(&mut bob).await;
}

#[tokio::test]
async fn test_join_unknown_code_creates_room() {
    // テスト項目: 未知のコードへの join がルームを作成する（receiver でも）
    // given (前提条件):
    let server = TestServer::start().await;
    let mut bob = connect(&server, "bob").await;

    // when (操作):
    send_event(&mut bob, join_event("zz99zz", "bob", "receiver")).await;

    // then (期待する結果): ルームが生まれ、bob がそのメンバーになる
    wait_for_members(&server.base_url(), "zz99zz", 1).await;
}

#[tokio::test]
async fn test_same_role_rejoin_displaces_prior_occupant() {
    // テスト項目: 同じ role での再 join が先客の購読を奪う（last writer wins）
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;
    let mut mallory = connect(&server, "mallory").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    send_event(&mut bob, join_event("ab12cd", "bob", "receiver")).await;
    wait_for_members(&server.base_url(), "ab12cd", 2).await;

    // when (操作): mallory が receiver として再 join
    send_event(&mut mallory, join_event("ab12cd", "mallory", "receiver")).await;
    wait_for_receiver(&server.base_url(), "ab12cd", "mallory").await;

    // then (期待する結果): 以降の配信は mallory に向かい、bob には届かない
    send_event(&mut alice, chat_event("ab12cd", "alice", "hello", "creator")).await;
    assert_eq!(recv_message(&mut mallory).await.message, "hello");
    recv_nothing(&mut bob).await;
}

#[tokio::test]
async fn test_rejoin_over_new_connection_survives_old_teardown() {
    // テスト項目: 同じ sender_id の再接続と再 join の最中に、古い接続の
    //             後始末がルームと購読を奪わない
    // given (前提条件): alice の古い接続が開いたまま残っている
    let server = TestServer::start().await;
    let old_alice = connect(&server, "alice").await;

    // when (操作): 新しい接続で再接続し、ルームに join する
    //（この時点で古い接続のチャンネルは上書きされ、後始末が走る）
    let mut alice = connect(&server, "alice").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;

    // then (期待する結果): ルームは破棄されず、alice はメンバーのまま
    wait_for_members(&server.base_url(), "ab12cd", 1).await;

    // then (期待する結果): 配信は新しい接続に届く
    send_event(&mut alice, chat_event("ab12cd", "alice", "still here", "creator")).await;
    assert_eq!(recv_message(&mut alice).await.message, "still here");

    // when (操作): 古い接続がクライアント側からも閉じられる
    drop(old_alice);
    tokio::time::sleep(Duration::from_millis(100)).await;

    // then (期待する結果): メンバーシップは保たれたまま
    wait_for_members(&server.base_url(), "ab12cd", 1).await;
}

#[tokio::test]
async fn test_disconnect_releases_slot_then_destroys_empty_room() {
    // テスト項目: 切断で role スロットが解放され、最後の切断でルームが消える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;
    send_event(&mut alice, join_event("ab12cd", "alice", "creator")).await;
    send_event(&mut bob, join_event("ab12cd", "bob", "receiver")).await;
    wait_for_members(&server.base_url(), "ab12cd", 2).await;

    // when (操作): bob が切断
    bob.close(None).await.expect("Failed to close");
    drop(bob);

    // then (期待する結果): スロットだけが解放される
    wait_for_members(&server.base_url(), "ab12cd", 1).await;

    // when (操作): alice も切断
    alice.close(None).await.expect("Failed to close");
    drop(alice);

    // then (期待する結果): 空になったルームは破棄される
    wait_for_room_gone(&server.base_url(), "ab12cd").await;
}

/// Poll the room detail endpoint until it returns 404.
async fn wait_for_room_gone(base_url: &str, room_id: &str) {
    let client = reqwest::Client::new();
    for _ in 0..40 {
        if let Ok(response) = client
            .get(format!("{}/api/rooms/{}", base_url, room_id))
            .send()
            .await
            && response.status() == 404
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Room '{}' was not destroyed in time", room_id);
}

/// Poll the room detail endpoint until the receiver slot holds `sender_id`.
async fn wait_for_receiver(base_url: &str, room_id: &str, sender_id: &str) {
    let client = reqwest::Client::new();
    for _ in 0..40 {
        if let Ok(response) = client
            .get(format!("{}/api/rooms/{}", base_url, room_id))
            .send()
            .await
            && response.status() == 200
            && let Ok(body) = response.json::<serde_json::Value>().await
            && body["members"].as_array().is_some_and(|members| {
                members
                    .iter()
                    .any(|m| m["role"] == "receiver" && m["sender_id"] == sender_id)
            })
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "Receiver slot of room '{}' never became '{}'",
        room_id, sender_id
    );
}
