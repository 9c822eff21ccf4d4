//! HTTP mail relay client.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{EmailMessage, Mailer};
use crate::error::ChannelError;

/// Mailer that posts messages to an HTTP relay endpoint.
///
/// The relay owns templating and SMTP; this client ships the rendered
/// fields as JSON. Timeouts are enforced by the dispatcher, not here.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    recipient_name: &'a str,
    link: &'a str,
    body: &'a str,
}

impl HttpMailer {
    /// Create a mailer for the given relay endpoint and sender address.
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), ChannelError> {
        let payload = RelayPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            recipient_name: &message.recipient_name,
            link: &message.link,
            body: &message.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChannelError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Delivery(format!(
                "relay returned {status} for {}",
                message.to
            )));
        }

        debug!(to = %message.to, "Email handed to relay");
        Ok(())
    }
}
