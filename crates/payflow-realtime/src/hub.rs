//! Per-user connection registry.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use payflow_notifier::channel::{PushChannel, PushPayload};
use payflow_notifier::error::ChannelError;

use crate::message::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<String>,
}

/// Registry of live WebSocket connections, keyed by user.
///
/// A user may hold several connections (browser tabs, devices); pushes go
/// to all of them. Senders are bounded so a stalled client drops messages
/// instead of backing up the dispatcher.
pub struct PushHub {
    connections: DashMap<Uuid, Vec<Connection>>,
    buffer_size: usize,
}

impl PushHub {
    /// Create a hub with the given per-connection buffer size.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            connections: DashMap::new(),
            buffer_size,
        }
    }

    /// Register a new authenticated connection for a user.
    ///
    /// Returns the connection id and the receiver the socket task drains.
    pub fn register(&self, user_id: Uuid) -> (ConnectionId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let id = Uuid::new_v4();
        if let Ok(greeting) = (OutboundMessage::Connected { user_id }).to_json() {
            let _ = tx.try_send(greeting);
        }
        self.connections
            .entry(user_id)
            .or_default()
            .push(Connection { id, sender: tx });
        info!(conn_id = %id, user_id = %user_id, "WebSocket connection registered");
        (id, rx)
    }

    /// Remove a connection. Dropping the last one takes the user offline.
    pub fn unregister(&self, user_id: Uuid, conn_id: ConnectionId) {
        if let Some(mut entry) = self.connections.get_mut(&user_id) {
            entry.retain(|c| c.id != conn_id);
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.connections.remove(&user_id);
            }
        }
        debug!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection removed");
    }

    /// Whether the user has at least one live connection.
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.connections
            .get(&user_id)
            .map(|c| !c.is_empty())
            .unwrap_or(false)
    }

    /// Number of users with at least one live connection.
    pub fn online_users(&self) -> usize {
        self.connections.len()
    }

    /// Deliver a pre-serialized message to one specific connection.
    /// Returns whether the connection accepted it.
    pub fn deliver_raw(&self, user_id: Uuid, conn_id: ConnectionId, json: String) -> bool {
        self.connections
            .get(&user_id)
            .and_then(|conns| {
                conns
                    .iter()
                    .find(|c| c.id == conn_id)
                    .map(|c| c.sender.try_send(json).is_ok())
            })
            .unwrap_or(false)
    }

    /// Deliver an outbound message to every connection a user holds.
    /// Returns how many connections accepted it.
    pub fn deliver(&self, user_id: Uuid, message: &OutboundMessage) -> Result<usize, ChannelError> {
        let Some(conns) = self.connections.get(&user_id) else {
            return Ok(0);
        };
        let json = message
            .to_json()
            .map_err(|e| ChannelError::Delivery(e.to_string()))?;

        let mut accepted = 0;
        for conn in conns.iter() {
            // try_send: a full buffer means the client is stalled and the
            // message is dropped for that socket only.
            if conn.sender.try_send(json.clone()).is_ok() {
                accepted += 1;
            }
        }
        Ok(accepted)
    }
}

#[async_trait]
impl PushChannel for PushHub {
    async fn send_to_user(&self, user_id: Uuid, payload: PushPayload) -> Result<(), ChannelError> {
        let delivered = self.deliver(user_id, &OutboundMessage::Notification {
            notification: payload,
        })?;
        debug!(user_id = %user_id, delivered, "Push delivery attempted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use payflow_entity::notification::{NotificationKind, Priority};

    fn payload() -> PushPayload {
        PushPayload {
            id: Uuid::new_v4(),
            message: "✅ aprobada".to_string(),
            kind: NotificationKind::RequestApproved,
            priority: Priority::Normal,
            actor_name: "Ana".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_push_reaches_every_connection() {
        let hub = PushHub::new(8);
        let user = Uuid::new_v4();
        let (_id_a, mut rx_a) = hub.register(user);
        let (_id_b, mut rx_b) = hub.register(user);

        // Each socket gets the connected greeting first.
        assert!(rx_a.try_recv().unwrap().contains("connected"));
        assert!(rx_b.try_recv().unwrap().contains("connected"));

        hub.send_to_user(user, payload()).await.unwrap();

        let a = rx_a.try_recv().unwrap();
        let b = rx_b.try_recv().unwrap();
        assert!(a.contains("aprobada"));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_offline_user_is_a_noop() {
        let hub = PushHub::new(8);
        assert!(hub.send_to_user(Uuid::new_v4(), payload()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_takes_user_offline() {
        let hub = PushHub::new(8);
        let user = Uuid::new_v4();
        let (id, _rx) = hub.register(user);
        assert!(hub.is_online(user));

        hub.unregister(user, id);
        assert!(!hub.is_online(user));
        assert_eq!(hub.online_users(), 0);
    }

    #[tokio::test]
    async fn test_full_buffer_drops_instead_of_erroring() {
        let hub = PushHub::new(1);
        let user = Uuid::new_v4();
        // The greeting already fills the single-slot buffer.
        let (_id, _rx) = hub.register(user);

        assert!(hub.send_to_user(user, payload()).await.is_ok());
        assert!(hub.send_to_user(user, payload()).await.is_ok());
    }
}
