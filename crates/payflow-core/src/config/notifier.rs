//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Notification fan-out and channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Link embedded in notification emails, pointing at the web portal.
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
    /// Mail-relay HTTP endpoint. Empty disables the email channel.
    #[serde(default)]
    pub mail_endpoint: String,
    /// Sender address reported to the mail relay.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Upper bound on a single push or email delivery attempt, in
    /// milliseconds. A slow provider must not stall the whole dispatch.
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_ms: u64,
    /// Default page size for notification listings.
    #[serde(default = "default_list_limit")]
    pub list_limit: i64,
    /// Per-user WebSocket buffer size for the push hub.
    #[serde(default = "default_push_buffer")]
    pub push_buffer_size: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
            mail_endpoint: String::new(),
            mail_from: default_mail_from(),
            channel_timeout_ms: default_channel_timeout(),
            list_limit: default_list_limit(),
            push_buffer_size: default_push_buffer(),
        }
    }
}

fn default_portal_url() -> String {
    "https://payflow.example.com".to_string()
}

fn default_mail_from() -> String {
    "no-reply@payflow.example.com".to_string()
}

fn default_channel_timeout() -> u64 {
    5000
}

fn default_list_limit() -> i64 {
    50
}

fn default_push_buffer() -> usize {
    64
}
