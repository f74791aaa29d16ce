//! WebSocket Message Types
//!
//! Messages exchanged between the portal in the browser and the server's
//! session-change socket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{AuthEvent, AuthEventKind};
use crate::portal::AUTH_PATH;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The user's session changed
    AuthStateChanged {
        event: AuthEventKind,
        /// Whether a session still exists after the change
        signed_in: bool,
        /// Where the page should navigate, set on sign-out
        #[serde(skip_serializing_if = "Option::is_none")]
        redirect: Option<String>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        message: String,
    },
    /// Connection established
    Connected {
        connection_id: String,
        user_id: Uuid,
    },
}

/// Internal event routed through the hub to one user's connections
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub user_id: Uuid,
    pub message: ServerMessage,
}

impl From<AuthEvent> for SessionEvent {
    fn from(event: AuthEvent) -> Self {
        let signed_in = event.kind.has_session();
        Self {
            user_id: event.user_id,
            message: ServerMessage::AuthStateChanged {
                event: event.kind,
                signed_in,
                redirect: (!signed_in).then(|| AUTH_PATH.to_string()),
            },
        }
    }
}
