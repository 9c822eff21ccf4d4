//! Outbound WebSocket message envelope.

use serde::Serialize;
use uuid::Uuid;

use payflow_notifier::channel::PushPayload;

/// Messages the server pushes to a connected client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Sent once after the socket is registered.
    Connected {
        /// The authenticated user the socket belongs to.
        user_id: Uuid,
    },
    /// A freshly persisted notification.
    Notification {
        /// The notification payload.
        notification: PushPayload,
    },
    /// Heartbeat reply.
    Pong,
}

impl OutboundMessage {
    /// Serialize for the wire. The envelope contains no user input that
    /// can fail serialization, so this only errors on allocation failure.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
