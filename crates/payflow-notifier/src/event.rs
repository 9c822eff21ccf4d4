//! Dispatch event types and builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use payflow_entity::notification::{EventDetails, NotificationKind};
use payflow_entity::user::UserRole;

/// Who a dispatch call is addressed to.
///
/// The original platform accepted an explicit user id XOR a role name as
/// two nullable parameters; the enum makes the exclusivity structural. An
/// event with no recipient at all dispatches as a logged no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// A single explicit user.
    User(Uuid),
    /// Every active user holding the role.
    Role(UserRole),
}

/// Audit metadata captured from the originating request. Not required for
/// delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMeta {
    /// Originating client IP.
    pub ip: Option<String>,
    /// Originating user agent.
    pub user_agent: Option<String>,
    /// When the triggering request was handled.
    pub timestamp: DateTime<Utc>,
}

/// An ephemeral domain event handed to the dispatcher.
///
/// Built by business operations right after their state mutation commits:
///
/// ```
/// use payflow_entity::notification::{EventDetails, NotificationKind};
/// use payflow_notifier::event::NotificationEvent;
/// use uuid::Uuid;
///
/// let approver = Uuid::new_v4();
/// let requester = Uuid::new_v4();
/// let event = NotificationEvent::new(NotificationKind::RequestApproved, approver, "solicitud")
///     .to_user(requester)
///     .entity_id("42")
///     .details(EventDetails::Request {
///         amount: Some(1500.0),
///         concept: Some("viaje".into()),
///         company: None,
///         payment_deadline: None,
///         requester_name: None,
///         requester_department: None,
///         reviewer_comment: None,
///         target_account: None,
///     })
///     .email(true);
/// assert!(event.send_push);
/// ```
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    /// The kind of domain event.
    pub kind: NotificationKind,
    /// The user whose action triggered the event.
    pub actor_id: Uuid,
    /// Addressing: explicit user, role fan-out, or none (logged no-op).
    pub recipient: Option<Recipient>,
    /// Business entity tag ("solicitud", "viatico", ...).
    pub entity_type: String,
    /// Business entity identifier, if any.
    pub entity_id: Option<String>,
    /// Event-specific details for message rendering.
    pub details: EventDetails,
    /// Whether to attempt real-time push delivery.
    pub send_push: bool,
    /// Whether the caller requests email delivery. High/critical priority
    /// escalates to email regardless of this flag.
    pub send_email: bool,
    /// Audit metadata from the originating request.
    pub meta: Option<RequestMeta>,
}

impl NotificationEvent {
    /// Start building an event. Push defaults on, email defaults off.
    pub fn new(kind: NotificationKind, actor_id: Uuid, entity_type: impl Into<String>) -> Self {
        Self {
            kind,
            actor_id,
            recipient: None,
            entity_type: entity_type.into(),
            entity_id: None,
            details: EventDetails::None,
            send_push: true,
            send_email: false,
            meta: None,
        }
    }

    /// Address the event to a single explicit user.
    pub fn to_user(mut self, user_id: Uuid) -> Self {
        self.recipient = Some(Recipient::User(user_id));
        self
    }

    /// Address the event to every active holder of a role.
    pub fn to_role(mut self, role: UserRole) -> Self {
        self.recipient = Some(Recipient::Role(role));
        self
    }

    /// Attach the business entity identifier.
    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Attach event-specific details.
    pub fn details(mut self, details: EventDetails) -> Self {
        self.details = details;
        self
    }

    /// Toggle push delivery.
    pub fn push(mut self, enabled: bool) -> Self {
        self.send_push = enabled;
        self
    }

    /// Toggle requested email delivery.
    pub fn email(mut self, enabled: bool) -> Self {
        self.send_email = enabled;
        self
    }

    /// Attach audit metadata.
    pub fn meta(mut self, meta: RequestMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}
