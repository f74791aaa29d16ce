//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.
//! The upgrade is refused unless `?token=` resolves to a live session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::hub::SessionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::{ApiError, ApiResult, AppState};

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Access token; browsers cannot set headers on a WebSocket handshake
    pub token: Option<String>,
}

/// WebSocket upgrade handler
///
/// The token is checked before the upgrade headers, so a stale session
/// gets the usual 401 with its redirect.
pub async fn websocket_handler(
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
    ws: Option<WebSocketUpgrade>,
) -> ApiResult<Response> {
    let session = state.require_session(params.token.as_deref()).await?;
    let ws = ws.ok_or_else(|| {
        ApiError::Validation("expected a WebSocket upgrade request".to_string())
    })?;
    let hub = Arc::clone(&state.hub);
    let user_id = session.user_id();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, hub, user_id)))
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<SessionHub>, user_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(user_id, tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "Refusing WebSocket connection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Some(message) = encode(&error_msg) {
                let _ = sender.send(message).await;
            }
            return;
        }
    };

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
        user_id,
    };
    let sent = match encode(&connected) {
        Some(message) => sender.send(message).await.is_ok(),
        None => false,
    };
    if !sent {
        tracing::error!(connection_id = %connection_id, "Failed to send connected message");
        hub.unregister(&connection_id).await;
        return;
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(message) = encode(&msg) else {
                continue;
            };
            if sender.send(message).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &conn_id_for_recv, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&connection_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(hub: &SessionHub, connection_id: &str, message: Message) -> bool {
    match message {
        Message::Text(text) => {
            let reply = match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => ServerMessage::Pong,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Invalid client message"
                    );
                    ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    }
                }
            };
            let _ = hub.send_to(connection_id, reply).await;
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::HubConfig;

    #[tokio::test]
    async fn test_text_ping_gets_pong() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(Uuid::new_v4(), tx).await.unwrap();

        let keep_open =
            handle_ws_message(&hub, &id, Message::Text(r#"{"type":"ping"}"#.to_string())).await;
        assert!(keep_open);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Pong)));
    }

    #[tokio::test]
    async fn test_garbage_keeps_connection_open() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(Uuid::new_v4(), tx).await.unwrap();

        assert!(handle_ws_message(&hub, &id, Message::Text("nope".to_string())).await);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Error { .. })));
    }

    #[tokio::test]
    async fn test_close_ends_connection() {
        let hub = SessionHub::new(HubConfig::default());
        assert!(!handle_ws_message(&hub, "any", Message::Close(None)).await);
    }
}
