//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use aizuchi_server::domain::Role;
use aizuchi_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use aizuchi_shared::time::get_jst_timestamp;

use crate::{
    controller::SessionController,
    error::{ClientError, SessionError},
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one WebSocket client session.
///
/// The controller is shared with the caller so that an open session
/// survives a dropped connection: on the next call its `join_request`
/// re-establishes the room subscription.
pub async fn run_client_session(
    url: &str,
    sender_id: &str,
    controller: Arc<Mutex<SessionController>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Construct URL with sender_id as query parameter
    let url = format!("{}?sender_id={}", url, sender_id);

    let (ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to room broker!");
    println!("\nYou are '{}'.{}", sender_id, MessageFormatter::format_help());

    let (mut write, mut read) = ws_stream.split();

    // Re-establish the room subscription if a session survived a reconnect
    if let Some(join) = controller.lock().await.join_request() {
        tracing::info!("Re-joining room '{}' after reconnect", join.chat_id);
        let json = serde_json::to_string(&ClientEvent::JoinRoom(join))?;
        write.send(Message::Text(json.into())).await?;
    }

    // Clone sender_id for read task
    let sender_id_for_read = sender_id.to_string();
    let controller_for_read = controller.clone();

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::Message(payload)) => {
                            // close 済み・別ルーム宛のイベントはここで破棄される
                            let accepted = controller_for_read
                                .lock()
                                .await
                                .on_message_received(payload);
                            if let Some(received) = accepted {
                                let formatted = MessageFormatter::format_chat_message(
                                    &received,
                                    &sender_id_for_read,
                                    get_jst_timestamp(),
                                );
                                print!("{}", formatted);
                                redisplay_prompt(&sender_id_for_read);
                            }
                        }
                        Err(_) => {
                            let formatted = MessageFormatter::format_raw_message(&text);
                            print!("{}", formatted);
                            redisplay_prompt(&sender_id_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone sender_id for the input loop
    let sender_id = sender_id.to_string();
    let sender_id_for_prompt = sender_id.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", sender_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send events to the broker
    let controller_for_write = controller.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = match handle_input(&controller_for_write, &line).await {
                InputOutcome::Send(event) => event,
                InputOutcome::Handled => continue,
                InputOutcome::Quit => break,
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}

/// Result of interpreting one line of user input.
enum InputOutcome {
    /// Send this event to the broker
    Send(ClientEvent),
    /// The input was handled locally (or rejected); nothing to send
    Handled,
    /// Exit the client
    Quit,
}

/// Interpret one line of input against the session controller.
///
/// Commands start with `/`; anything else is chat text.
async fn handle_input(controller: &Arc<Mutex<SessionController>>, line: &str) -> InputOutcome {
    let mut controller = controller.lock().await;

    if line == "/quit" {
        return InputOutcome::Quit;
    }

    if line == "/create" {
        return match controller.create_room() {
            Ok(payload) => {
                let banner =
                    MessageFormatter::format_session_opened(&payload.chat_id, Role::Creator);
                print!("{}", banner);
                InputOutcome::Send(ClientEvent::JoinRoom(payload))
            }
            Err(e) => {
                eprintln!("{}", e);
                InputOutcome::Handled
            }
        };
    }

    if line == "/join" || line.starts_with("/join ") {
        let code = line.strip_prefix("/join").unwrap_or_default();
        return match controller.join_room(code) {
            Ok(payload) => {
                let banner =
                    MessageFormatter::format_session_opened(&payload.chat_id, Role::Receiver);
                print!("{}", banner);
                InputOutcome::Send(ClientEvent::JoinRoom(payload))
            }
            Err(e) => {
                eprintln!("{}", e);
                InputOutcome::Handled
            }
        };
    }

    if line == "/close" {
        return match controller.close_chat() {
            Some(payload) => {
                print!("{}", MessageFormatter::format_session_closed(&payload.chat_id));
                InputOutcome::Send(ClientEvent::CloseChat(payload))
            }
            None => {
                eprintln!("{}", SessionError::SessionNotOpen);
                InputOutcome::Handled
            }
        };
    }

    match controller.send_message(line) {
        Ok(Some(payload)) => InputOutcome::Send(ClientEvent::ChatMessage(payload)),
        Ok(None) => InputOutcome::Handled,
        Err(e) => {
            eprintln!("{} (use /create or /join <code> first)", e);
            InputOutcome::Handled
        }
    }
}
