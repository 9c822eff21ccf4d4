//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;
use super::priority::Priority;

/// A persisted notification, one row per recipient per dispatch.
///
/// The message is fully rendered at write time for the recipient's role,
/// so historical wording survives later role changes and read paths never
/// join against the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRecord {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub recipient_id: Uuid,
    /// Fully rendered, recipient-specific message. May contain lightweight
    /// `<strong>`/`<br>` markup.
    pub message: String,
    /// Event kind that produced this notification.
    pub kind: NotificationKind,
    /// Urgency level assigned at dispatch time.
    pub priority: Priority,
    /// Business entity tag ("solicitud", "viatico", ...).
    pub entity_type: String,
    /// Business entity identifier, if any.
    pub entity_id: Option<String>,
    /// The user whose action triggered the event.
    pub actor_id: Uuid,
    /// Structured event details as dispatched (JSON).
    pub payload: Option<serde_json::Value>,
    /// Whether the recipient has read this notification.
    pub read: bool,
    /// When the notification was created (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A notification row joined with the emitting user's identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnrichedNotification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Fully rendered message.
    pub message: String,
    /// Event kind.
    pub kind: NotificationKind,
    /// Urgency level.
    pub priority: Priority,
    /// Business entity tag.
    pub entity_type: String,
    /// Business entity identifier, if any.
    pub entity_id: Option<String>,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Emitter's display name, when the account still exists.
    pub actor_name: Option<String>,
    /// Emitter's role, when the account still exists.
    pub actor_role: Option<String>,
}

/// Per-user aggregate notification counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationStats {
    /// Total notifications for the user.
    pub total: i64,
    /// Unread notifications.
    pub unread: i64,
    /// Unread notifications with high priority.
    pub unread_high: i64,
    /// Unread notifications with critical priority.
    pub unread_critical: i64,
    /// Unread notifications about payment requests.
    pub pending_requests: i64,
    /// Unread notifications about travel expenses.
    pub pending_travel: i64,
}
