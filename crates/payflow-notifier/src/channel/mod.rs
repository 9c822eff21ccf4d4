//! Delivery channel seams.
//!
//! Persistence is the source of truth; push and email are best-effort side
//! channels behind these traits. Implementations must not panic; any
//! failure surfaces as a [`ChannelError`] that the dispatcher logs and
//! drops.

pub mod email;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use payflow_entity::notification::{NotificationKind, Priority};

use crate::error::ChannelError;

pub use email::HttpMailer;

/// The real-time payload pushed to a connected recipient.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    /// Persisted notification id.
    pub id: Uuid,
    /// Rendered message, markup included.
    pub message: String,
    /// Event kind.
    pub kind: NotificationKind,
    /// Assigned priority.
    pub priority: Priority,
    /// Display name of the emitting user.
    pub actor_name: String,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

/// An email ready for the relay.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Recipient display name for the greeting.
    pub recipient_name: String,
    /// Link back into the portal.
    pub link: String,
    /// Plain-text body, markup stripped.
    pub body: String,
}

/// Real-time push delivery to online users.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Deliver a payload to a user's live connections. Offline recipients
    /// are a successful no-op.
    async fn send_to_user(&self, user_id: Uuid, payload: PushPayload) -> Result<(), ChannelError>;
}

/// Email delivery through the configured relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the relay.
    async fn send(&self, message: EmailMessage) -> Result<(), ChannelError>;
}

/// Reduce a rendered message to plain text for email bodies.
///
/// `<br>` becomes a newline, remaining tags are dropped, text is kept.
pub fn strip_markup(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) => {
                let tag = after[1..close].trim().to_ascii_lowercase();
                if tag == "br" || tag == "br/" || tag == "br /" {
                    out.push('\n');
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unterminated tag, keep the raw text.
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_converts_breaks_and_drops_tags() {
        let msg = "✅ <strong>Pedro</strong> aprobó<br>💰 <strong>Monto:</strong> $1,500";
        assert_eq!(strip_markup(msg), "✅ Pedro aprobó\n💰 Monto: $1,500");
    }

    #[test]
    fn test_strip_markup_plain_text_unchanged() {
        assert_eq!(strip_markup("sin marcado"), "sin marcado");
    }

    #[test]
    fn test_strip_markup_unterminated_tag_kept() {
        assert_eq!(strip_markup("roto <strong"), "roto <strong");
    }
}
