//! WebSocket Session Hub
//!
//! Tracks open session-change sockets and routes backend auth events to the
//! connections of the affected user.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::messages::{ServerMessage, SessionEvent};
use crate::backend::AuthEvent;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections, indexed by user
pub struct SessionHub {
    inner: RwLock<HubInner>,
    config: HubConfig,
}

/// Connection table and user index, always updated together
#[derive(Default)]
struct HubInner {
    /// Active connections: ConnectionId → ConnectionHandle
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// User → connections of that user
    by_user: HashMap<Uuid, HashSet<ConnectionId>>,
}

/// Configuration for the session hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    pub user_id: Uuid,
}

impl SessionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            inner: RwLock::new(HubInner::default()),
            config,
        }
    }

    /// Register a new WebSocket connection for a signed-in user
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        user_id: Uuid,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut inner = self.inner.write().await;
        if inner.connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        inner
            .connections
            .insert(id.clone(), ConnectionHandle { sender, user_id });
        inner.by_user.entry(user_id).or_default().insert(id.clone());
        drop(inner);

        tracing::info!(connection_id = %id, user_id = %user_id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and drop its user index entry
    pub async fn unregister(&self, id: &str) {
        let mut inner = self.inner.write().await;
        if let Some(handle) = inner.connections.remove(id) {
            if let Some(ids) = inner.by_user.get_mut(&handle.user_id) {
                ids.remove(id);
                if ids.is_empty() {
                    inner.by_user.remove(&handle.user_id);
                }
            }
        }
        drop(inner);

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Deliver an event to every connection of its user
    ///
    /// Returns how many connections accepted the message.
    pub async fn dispatch(&self, event: &SessionEvent) -> usize {
        let inner = self.inner.read().await;

        let sent = inner
            .by_user
            .get(&event.user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.connections.get(id))
            .filter(|handle| handle.sender.send(event.message.clone()).is_ok())
            .count();
        drop(inner);

        tracing::debug!(user_id = %event.user_id, connections = sent, "Dispatched session event");
        sent
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let inner = self.inner.read().await;
        let handle = inner.connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle
            .sender
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    /// Forward backend auth events into the hub until the channel closes
    pub fn forward(self: &Arc<Self>, mut events: broadcast::Receiver<AuthEvent>) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        hub.dispatch(&SessionEvent::from(event)).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session hub lagged behind auth events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Auth event forwarding stopped");
        })
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Number of open connections of one user
    pub async fn user_connection_count(&self, user_id: Uuid) -> usize {
        self.inner
            .read()
            .await
            .by_user
            .get(&user_id)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }
}

/// Errors that can occur in the session hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}
