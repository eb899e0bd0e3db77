//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tracing::{debug, warn};

use super::events::{ClientMessage, ServerMessage};
use crate::api::sse::StreamError;
use crate::api::{wait_for_shutdown, AppState};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Send one message, returning false if the client is gone
async fn send(socket: &mut WebSocket, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize WebSocket message, skipping it");
            true
        }
    }
}

/// Handle an individual WebSocket connection
///
/// Replays the history, then forwards live entries until the client closes,
/// a send fails, the hub drops the subscriber or the server stops. The
/// subscription is released on every one of those paths when it goes out of
/// scope.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut subscription = state.hub.subscribe();
    let mut shutdown = state.shutdown_receiver();
    let history = subscription.take_history();
    debug!(subscriber = %subscription.id(), history = history.len(), "WebSocket client attached");

    if !send(&mut socket, &ServerMessage::Connected { history_len: history.len() }).await {
        return; // Client disconnected immediately
    }

    for entry in history {
        if !send(&mut socket, &ServerMessage::LogEntry { entry }).await {
            return;
        }
    }

    loop {
        // Entries already received go out before the socket or shutdown
        tokio::select! {
            biased;

            result = subscription.recv() => {
                match result {
                    Some(entry) => {
                        if !send(&mut socket, &ServerMessage::LogEntry { entry }).await {
                            break; // Client disconnected
                        }
                    }
                    None => {
                        // Fell too far behind
                        let _ = send(&mut socket, &StreamError::dropped().into()).await;
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break; // Client requested close or error
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }

            _ = wait_for_shutdown(&mut shutdown) => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    debug!(subscriber = %subscription.id(), "WebSocket client detached");
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(text) => {
            if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                return send(socket, &ServerMessage::Pong).await;
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true, // Ignore pong responses
        Message::Close(_) => false, // Client requested close
    }
}
