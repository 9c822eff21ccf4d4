//! Audit action logging.
//!
//! Business operations describe what happened as a verb plus an entity
//! family; this module maps that pair to a notification kind and feeds the
//! dispatcher. When a dispatch aborts and the deployment has exactly one
//! active general admin, a degraded plain-text notification is written
//! directly so the audit trail never goes silent.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use payflow_entity::notification::{EventDetails, NotificationKind, Priority};
use payflow_entity::user::UserRole;

use crate::channel::{PushChannel, PushPayload};
use crate::dispatcher::NotificationDispatcher;
use crate::event::{NotificationEvent, Recipient, RequestMeta};
use crate::priority::classify;
use crate::store::{NewNotification, NotificationStore, UserDirectory};

/// What the actor did, in audit vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerb {
    Created,
    Approved,
    Rejected,
    Paid,
    Updated,
    Deleted,
    Uploaded,
    Executed,
}

impl ActionVerb {
    /// Past-tense Spanish label used in degraded messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "creó",
            Self::Approved => "aprobó",
            Self::Rejected => "rechazó",
            Self::Paid => "pagó",
            Self::Updated => "actualizó",
            Self::Deleted => "eliminó",
            Self::Uploaded => "subió",
            Self::Executed => "ejecutó",
        }
    }
}

/// Which entity family the action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEntity {
    Request,
    Travel,
    Recurring,
    Receipt,
    User,
    Batch,
}

impl ActionEntity {
    /// Wire tag stored in `entity_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "solicitud",
            Self::Travel => "viatico",
            Self::Recurring => "recurrente",
            Self::Receipt => "comprobante",
            Self::User => "usuario",
            Self::Batch => "lote",
        }
    }
}

/// Map a verb/entity pair to its notification kind.
///
/// Pairs outside the table fall back to the generic system action kind,
/// which renders the generic message.
pub fn map_action(verb: ActionVerb, entity: ActionEntity) -> NotificationKind {
    use ActionEntity as E;
    use ActionVerb as V;

    match (verb, entity) {
        (V::Created, E::Request) => NotificationKind::RequestCreated,
        (V::Approved, E::Request) => NotificationKind::RequestApproved,
        (V::Rejected, E::Request) => NotificationKind::RequestRejected,
        (V::Paid, E::Request) => NotificationKind::RequestPaid,
        (V::Updated, E::Request) => NotificationKind::RequestUpdated,
        (V::Deleted, E::Request) => NotificationKind::RequestDeleted,

        (V::Created, E::Travel) => NotificationKind::TravelCreated,
        (V::Approved, E::Travel) => NotificationKind::TravelApproved,
        (V::Rejected, E::Travel) => NotificationKind::TravelRejected,
        (V::Paid, E::Travel) => NotificationKind::TravelPaid,

        (V::Created, E::Recurring) => NotificationKind::RecurringCreated,
        (V::Approved, E::Recurring) => NotificationKind::RecurringApproved,
        (V::Rejected, E::Recurring) => NotificationKind::RecurringRejected,
        (V::Executed, E::Recurring) => NotificationKind::RecurringExecuted,

        (V::Uploaded, E::Receipt) => NotificationKind::ReceiptUploaded,
        (V::Approved, E::Receipt) => NotificationKind::ReceiptApproved,
        (V::Rejected, E::Receipt) => NotificationKind::ReceiptRejected,

        (V::Created, E::User) => NotificationKind::UserCreated,
        (V::Updated, E::User) => NotificationKind::UserUpdated,
        (V::Deleted, E::User) => NotificationKind::UserDeleted,

        (V::Approved, E::Batch) => NotificationKind::BatchApproved,
        (V::Rejected, E::Batch) => NotificationKind::BatchRejected,
        (V::Paid, E::Batch) => NotificationKind::BatchPaid,

        _ => NotificationKind::SystemAction,
    }
}

/// Whether an audit kind must reach recipients by email regardless of what
/// the caller asked for. Rejections, payments and critical kinds qualify.
fn email_required(kind: NotificationKind) -> bool {
    kind.is_rejection() || kind.is_payment() || classify(kind) == Priority::Critical
}

/// An audited business action ready for logging.
#[derive(Debug, Clone)]
pub struct LoggedAction {
    pub verb: ActionVerb,
    pub entity: ActionEntity,
    pub actor_id: Uuid,
    pub recipient: Option<Recipient>,
    pub entity_id: Option<String>,
    pub details: EventDetails,
    pub meta: Option<RequestMeta>,
}

impl LoggedAction {
    /// Start describing an action.
    pub fn new(verb: ActionVerb, entity: ActionEntity, actor_id: Uuid) -> Self {
        Self {
            verb,
            entity,
            actor_id,
            recipient: None,
            entity_id: None,
            details: EventDetails::None,
            meta: None,
        }
    }

    pub fn to_role(mut self, role: UserRole) -> Self {
        self.recipient = Some(Recipient::Role(role));
        self
    }

    pub fn to_user(mut self, user_id: Uuid) -> Self {
        self.recipient = Some(Recipient::User(user_id));
        self
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: EventDetails) -> Self {
        self.details = details;
        self
    }

    pub fn meta(mut self, meta: RequestMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Turns audited actions into notifications, with a degraded fallback.
pub struct ActionLogger {
    dispatcher: Arc<NotificationDispatcher>,
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn NotificationStore>,
    push: Option<Arc<dyn PushChannel>>,
}

impl ActionLogger {
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn NotificationStore>,
        push: Option<Arc<dyn PushChannel>>,
    ) -> Self {
        Self {
            dispatcher,
            directory,
            store,
            push,
        }
    }

    /// Log one action. Absorbs every failure; business operations call
    /// this fire-and-forget. Actions without an explicit recipient go to
    /// the general admins.
    pub async fn log(&self, action: LoggedAction) {
        let kind = map_action(action.verb, action.entity);

        let mut event =
            NotificationEvent::new(kind, action.actor_id, action.entity.as_str())
                .email(email_required(kind));
        event.recipient = action
            .recipient
            .or(Some(Recipient::Role(UserRole::AdminGeneral)));
        event.entity_id = action.entity_id.clone();
        event.details = action.details.clone();
        event.meta = action.meta.clone();

        if let Err(e) = self.dispatcher.try_dispatch(&event).await {
            warn!(
                verb = action.verb.label(),
                entity = action.entity.as_str(),
                error = %e,
                "Action dispatch failed, attempting degraded admin notification"
            );
            self.fallback_to_admin(&action, kind).await;
        }
    }

    /// Convenience for request lifecycle actions. Creation addresses the
    /// approvers; every later transition addresses the general admins.
    pub async fn log_request(
        &self,
        verb: ActionVerb,
        actor_id: Uuid,
        entity_id: impl Into<String>,
        details: EventDetails,
    ) {
        let role = if verb == ActionVerb::Created {
            UserRole::Approver
        } else {
            UserRole::AdminGeneral
        };
        self.log(
            LoggedAction::new(verb, ActionEntity::Request, actor_id)
                .to_role(role)
                .entity_id(entity_id)
                .details(details),
        )
        .await;
    }

    /// Convenience for travel expense actions, addressed like requests.
    pub async fn log_travel(
        &self,
        verb: ActionVerb,
        actor_id: Uuid,
        entity_id: impl Into<String>,
        details: EventDetails,
    ) {
        let role = if verb == ActionVerb::Created {
            UserRole::Approver
        } else {
            UserRole::AdminGeneral
        };
        self.log(
            LoggedAction::new(verb, ActionEntity::Travel, actor_id)
                .to_role(role)
                .entity_id(entity_id)
                .details(details),
        )
        .await;
    }

    /// Convenience for account administration actions, always addressed to
    /// the general admins.
    pub async fn log_user(
        &self,
        verb: ActionVerb,
        actor_id: Uuid,
        entity_id: impl Into<String>,
        details: EventDetails,
    ) {
        self.log(
            LoggedAction::new(verb, ActionEntity::User, actor_id)
                .to_role(UserRole::AdminGeneral)
                .entity_id(entity_id)
                .details(details),
        )
        .await;
    }

    /// Degraded path kept from the platform's single-admin era: when the
    /// deployment has exactly one active general admin, write a plain-text
    /// record for them directly. Ambiguous admin sets get nothing.
    async fn fallback_to_admin(&self, action: &LoggedAction, kind: NotificationKind) {
        let admins = match self
            .directory
            .active_users_by_role(UserRole::AdminGeneral)
            .await
        {
            Ok(admins) => admins,
            Err(e) => {
                warn!(error = %e, "Degraded admin lookup failed, action goes unlogged");
                return;
            }
        };
        if admins.len() != 1 {
            warn!(
                admins = admins.len(),
                "No single active admin for degraded notification, action goes unlogged"
            );
            return;
        }

        let admin = &admins[0];
        let actor = match self.directory.user_by_id(action.actor_id).await {
            Ok(actor) => actor,
            Err(_) => None,
        };
        let actor_line = match &actor {
            Some(a) => format!("{} ({})", a.name, a.role.label()),
            None => "Un usuario".to_string(),
        };
        let entity_ref = match &action.entity_id {
            Some(id) => format!(" #{id}"),
            None => String::new(),
        };
        let message = format!(
            "🔔 {} {} un(a) {}{}",
            actor_line,
            action.verb.label(),
            action.entity.as_str(),
            entity_ref
        );

        let record = match self
            .store
            .insert(NewNotification {
                recipient_id: admin.id,
                message,
                kind,
                priority: classify(kind),
                entity_type: action.entity.as_str().to_string(),
                entity_id: action.entity_id.clone(),
                actor_id: action.actor_id,
                payload: None,
            })
            .await
        {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Degraded admin notification failed, action goes unlogged");
                return;
            }
        };

        if let Some(push) = &self.push {
            let payload = PushPayload {
                id: record.id,
                message: record.message.clone(),
                kind: record.kind,
                priority: record.priority,
                actor_name: actor
                    .map(|a| a.name)
                    .unwrap_or_else(|| "Un usuario".to_string()),
                created_at: record.created_at,
            };
            if let Err(e) = push.send_to_user(admin.id, payload).await {
                warn!(error = %e, "Degraded admin push failed, record persisted anyway");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use crate::store::testing::{FakeDirectory, MemoryStore};
    use async_trait::async_trait;
    use payflow_core::config::NotifierConfig;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPush {
        sent: Mutex<Vec<(Uuid, PushPayload)>>,
    }

    #[async_trait]
    impl PushChannel for RecordingPush {
        async fn send_to_user(
            &self,
            user_id: Uuid,
            payload: PushPayload,
        ) -> Result<(), ChannelError> {
            self.sent.lock().unwrap().push((user_id, payload));
            Ok(())
        }
    }

    fn logger(directory: Arc<FakeDirectory>, store: Arc<MemoryStore>) -> ActionLogger {
        logger_with_push(directory, store, None)
    }

    fn logger_with_push(
        directory: Arc<FakeDirectory>,
        store: Arc<MemoryStore>,
        push: Option<Arc<dyn PushChannel>>,
    ) -> ActionLogger {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            directory.clone(),
            store.clone(),
            push.clone(),
            None,
            NotifierConfig::default(),
        ));
        ActionLogger::new(dispatcher, directory, store, push)
    }

    #[test]
    fn test_action_mapping_table() {
        assert_eq!(
            map_action(ActionVerb::Created, ActionEntity::Request),
            NotificationKind::RequestCreated
        );
        assert_eq!(
            map_action(ActionVerb::Paid, ActionEntity::Travel),
            NotificationKind::TravelPaid
        );
        assert_eq!(
            map_action(ActionVerb::Uploaded, ActionEntity::Receipt),
            NotificationKind::ReceiptUploaded
        );
        assert_eq!(
            map_action(ActionVerb::Rejected, ActionEntity::Batch),
            NotificationKind::BatchRejected
        );
    }

    #[test]
    fn test_unmapped_pairs_degrade_to_system_action() {
        assert_eq!(
            map_action(ActionVerb::Uploaded, ActionEntity::Request),
            NotificationKind::SystemAction
        );
        assert_eq!(
            map_action(ActionVerb::Executed, ActionEntity::User),
            NotificationKind::SystemAction
        );
    }

    #[test]
    fn test_email_required_for_rejections_and_payments() {
        assert!(email_required(NotificationKind::RequestRejected));
        assert!(email_required(NotificationKind::RequestPaid));
        assert!(email_required(NotificationKind::SystemAlert));
        assert!(!email_required(NotificationKind::RequestCreated));
        assert!(!email_required(NotificationKind::UserWelcome));
    }

    #[tokio::test]
    async fn test_request_creation_notifies_approvers() {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let actor = directory.add_user("Carla", UserRole::Requester, true);
        directory.add_user("Ana", UserRole::Approver, true);
        directory.add_user("Luis", UserRole::Approver, true);
        directory.add_user("Root", UserRole::AdminGeneral, true);

        let logger = logger(directory, store.clone());
        logger
            .log_request(ActionVerb::Created, actor, "42", EventDetails::None)
            .await;

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.kind == NotificationKind::RequestCreated));
    }

    #[tokio::test]
    async fn test_fallback_reaches_single_admin() {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let actor = directory.add_user("Carla", UserRole::Requester, true);
        let admin = directory.add_user("Root", UserRole::AdminGeneral, true);

        // No approvers exist, so the dispatch resolves nobody and aborts.
        let logger = logger(directory, store.clone());
        logger
            .log_request(ActionVerb::Created, actor, "42", EventDetails::None)
            .await;

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].recipient_id, admin);
        assert!(records[0].message.contains("Carla (Solicitante)"));
        assert!(records[0].message.contains("creó"));
        assert!(records[0].message.contains("#42"));
    }

    #[tokio::test]
    async fn test_missing_recipient_defaults_to_general_admins() {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let actor = directory.add_user("Carla", UserRole::Requester, true);
        directory.add_user("Root A", UserRole::AdminGeneral, true);
        directory.add_user("Root B", UserRole::AdminGeneral, true);

        let logger = logger(directory, store.clone());
        logger
            .log(LoggedAction::new(ActionVerb::Updated, ActionEntity::Request, actor).entity_id("42"))
            .await;

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.kind == NotificationKind::RequestUpdated));
    }

    #[tokio::test]
    async fn test_fallback_pushes_to_single_admin() {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let actor = directory.add_user("Carla", UserRole::Requester, true);
        let admin = directory.add_user("Root", UserRole::AdminGeneral, true);
        let push = Arc::new(RecordingPush::default());

        // Explicit approver recipient resolves nobody, forcing the fallback.
        let logger = logger_with_push(directory, store.clone(), Some(push.clone()));
        logger
            .log(
                LoggedAction::new(ActionVerb::Created, ActionEntity::Request, actor)
                    .to_role(UserRole::Approver)
                    .entity_id("42"),
            )
            .await;

        assert_eq!(store.records.lock().unwrap().len(), 1);
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, admin);
        assert!(sent[0].1.message.contains("creó"));
        assert_eq!(sent[0].1.actor_name, "Carla");
    }

    #[tokio::test]
    async fn test_fallback_skipped_with_multiple_admins() {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let actor = directory.add_user("Carla", UserRole::Requester, true);
        directory.add_user("Root A", UserRole::AdminGeneral, true);
        directory.add_user("Root B", UserRole::AdminGeneral, true);

        let logger = logger(directory, store.clone());
        logger
            .log_request(ActionVerb::Created, actor, "42", EventDetails::None)
            .await;

        assert!(store.records.lock().unwrap().is_empty());
    }
}
