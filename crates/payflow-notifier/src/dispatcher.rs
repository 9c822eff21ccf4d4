//! Dispatch orchestration.
//!
//! One entry point turns a domain event into persisted notifications and
//! best-effort channel deliveries. Persistence is authoritative: a record
//! that made it into the store counts as delivered even if every side
//! channel failed. Failures are isolated per recipient and per channel,
//! and `dispatch` absorbs everything so callers never have to handle
//! notification errors.

use std::sync::Arc;

use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use payflow_core::config::NotifierConfig;
use payflow_entity::notification::model::NotificationRecord;
use payflow_entity::notification::{EventDetails, Priority};
use payflow_entity::user::UserProfile;

use crate::channel::{strip_markup, EmailMessage, Mailer, PushChannel, PushPayload};
use crate::error::{ChannelError, DispatchError};
use crate::event::NotificationEvent;
use crate::message::synthesize;
use crate::priority::classify;
use crate::resolver::RecipientResolver;
use crate::store::{NewNotification, NotificationStore, UserDirectory};

/// What one dispatch call accomplished.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Recipients the address resolved to.
    pub recipients: usize,
    /// Records that were persisted.
    pub records: Vec<NotificationRecord>,
    /// Successful push deliveries.
    pub pushed: usize,
    /// Successful email handoffs.
    pub emailed: usize,
}

/// The notification dispatch engine.
///
/// Channels are optional: a dispatcher without a mailer simply skips the
/// email leg, and likewise for push.
pub struct NotificationDispatcher {
    directory: Arc<dyn UserDirectory>,
    resolver: RecipientResolver,
    store: Arc<dyn NotificationStore>,
    push: Option<Arc<dyn PushChannel>>,
    mailer: Option<Arc<dyn Mailer>>,
    config: NotifierConfig,
}

impl NotificationDispatcher {
    /// Assemble a dispatcher over its storage and channel seams.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn NotificationStore>,
        push: Option<Arc<dyn PushChannel>>,
        mailer: Option<Arc<dyn Mailer>>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(directory.clone()),
            directory,
            store,
            push,
            mailer,
            config,
        }
    }

    /// Dispatch an event, absorbing all failures.
    ///
    /// This is the entry point for business operations: it logs the outcome
    /// and returns the summary when anything was accomplished, `None`
    /// otherwise. It never returns an error and never panics.
    pub async fn dispatch(&self, event: &NotificationEvent) -> Option<DispatchSummary> {
        match self.try_dispatch(event).await {
            Ok(summary) => {
                info!(
                    kind = %event.kind,
                    recipients = summary.recipients,
                    persisted = summary.records.len(),
                    pushed = summary.pushed,
                    emailed = summary.emailed,
                    "Notification dispatched"
                );
                Some(summary)
            }
            Err(DispatchError::NoRecipients) => {
                debug!(kind = %event.kind, "Notification had no recipients, skipping");
                None
            }
            Err(e) => {
                warn!(kind = %event.kind, error = %e, "Notification dispatch failed");
                None
            }
        }
    }

    /// Dispatch an event, reporting aborts to the caller.
    ///
    /// Used where the caller needs to react to a failed dispatch, e.g. the
    /// action logger's degraded fallback. Per-recipient and per-channel
    /// failures are still absorbed; only whole-dispatch aborts surface.
    pub async fn try_dispatch(
        &self,
        event: &NotificationEvent,
    ) -> Result<DispatchSummary, DispatchError> {
        let actor = self
            .directory
            .user_by_id(event.actor_id)
            .await?
            .ok_or(DispatchError::EmitterNotFound(event.actor_id))?;

        let recipients = self.resolver.resolve(&event.recipient).await?;
        if recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let priority = classify(event.kind);
        let email_wanted = event.send_email || priority.forces_email();
        let payload = match &event.details {
            EventDetails::None => None,
            details => serde_json::to_value(details).ok(),
        };

        let mut summary = DispatchSummary {
            recipients: recipients.len(),
            ..DispatchSummary::default()
        };

        for recipient in &recipients {
            let message = synthesize(event.kind, &actor, recipient, &event.details);

            let record = match self
                .store
                .insert(NewNotification {
                    recipient_id: recipient.id,
                    message,
                    kind: event.kind,
                    priority,
                    entity_type: event.entity_type.clone(),
                    entity_id: event.entity_id.clone(),
                    actor_id: actor.id,
                    payload: payload.clone(),
                })
                .await
            {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        recipient = %recipient.id,
                        kind = %event.kind,
                        error = %e,
                        "Failed to persist notification, continuing with remaining recipients"
                    );
                    continue;
                }
            };

            if event.send_push {
                match self.push_one(recipient, &record, &actor).await {
                    Ok(true) => summary.pushed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(recipient = %recipient.id, error = %e, "Push delivery failed");
                    }
                }
            }

            if email_wanted {
                match self.email_one(recipient, &record, priority).await {
                    Ok(true) => summary.emailed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(recipient = %recipient.id, error = %e, "Email delivery failed");
                    }
                }
            }

            summary.records.push(record);
        }

        Ok(summary)
    }

    /// Push to one recipient under the channel timeout. `Ok(false)` means
    /// no push channel is wired.
    async fn push_one(
        &self,
        recipient: &UserProfile,
        record: &NotificationRecord,
        actor: &UserProfile,
    ) -> Result<bool, ChannelError> {
        let Some(push) = &self.push else {
            return Ok(false);
        };

        let payload = PushPayload {
            id: record.id,
            message: record.message.clone(),
            kind: record.kind,
            priority: record.priority,
            actor_name: actor.name.clone(),
            created_at: record.created_at,
        };

        let bound = Duration::from_millis(self.config.channel_timeout_ms);
        match timeout(bound, push.send_to_user(recipient.id, payload)).await {
            Ok(result) => result.map(|_| true),
            Err(_) => Err(ChannelError::Timeout(self.config.channel_timeout_ms)),
        }
    }

    /// Email one recipient under the channel timeout. `Ok(false)` means no
    /// mailer is wired.
    async fn email_one(
        &self,
        recipient: &UserProfile,
        record: &NotificationRecord,
        priority: Priority,
    ) -> Result<bool, ChannelError> {
        let Some(mailer) = &self.mailer else {
            return Ok(false);
        };

        let subject = if priority == Priority::Critical {
            "Payflow - Notificación Urgente".to_string()
        } else {
            "Payflow - Notificación".to_string()
        };

        let message = EmailMessage {
            to: recipient.email.clone(),
            subject,
            recipient_name: recipient.name.clone(),
            link: self.config.portal_url.clone(),
            body: strip_markup(&record.message),
        };

        let bound = Duration::from_millis(self.config.channel_timeout_ms);
        match timeout(bound, mailer.send(message)).await {
            Ok(result) => result.map(|_| true),
            Err(_) => Err(ChannelError::Timeout(self.config.channel_timeout_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{FakeDirectory, MemoryStore};
    use async_trait::async_trait;
    use payflow_entity::notification::NotificationKind;
    use payflow_entity::user::UserRole;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct FakePush {
        sent: Mutex<Vec<(Uuid, PushPayload)>>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl PushChannel for FakePush {
        async fn send_to_user(
            &self,
            user_id: Uuid,
            payload: PushPayload,
        ) -> Result<(), ChannelError> {
            if *self.fail.lock().unwrap() {
                return Err(ChannelError::Delivery("push down".into()));
            }
            self.sent.lock().unwrap().push((user_id, payload));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, message: EmailMessage) -> Result<(), ChannelError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct Harness {
        directory: Arc<FakeDirectory>,
        store: Arc<MemoryStore>,
        push: Arc<FakePush>,
        mailer: Arc<FakeMailer>,
        dispatcher: NotificationDispatcher,
    }

    fn harness() -> Harness {
        let directory = Arc::new(FakeDirectory::default());
        let store = Arc::new(MemoryStore::default());
        let push = Arc::new(FakePush::default());
        let mailer = Arc::new(FakeMailer::default());
        let dispatcher = NotificationDispatcher::new(
            directory.clone(),
            store.clone(),
            Some(push.clone()),
            Some(mailer.clone()),
            NotifierConfig::default(),
        );
        Harness {
            directory,
            store,
            push,
            mailer,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_role_fanout_persists_one_record_per_recipient() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);
        h.directory.add_user("Admin A", UserRole::AdminGeneral, true);
        h.directory.add_user("Admin B", UserRole::AdminGeneral, true);
        h.directory.add_user("Inactivo", UserRole::AdminGeneral, false);

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_role(UserRole::AdminGeneral);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.recipients, 2);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.pushed, 2);
        assert_eq!(h.store.records.lock().unwrap().len(), 2);
        // Normal priority, email not requested.
        assert!(h.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_emails_even_when_caller_declined() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Approver, true);
        let requester = h.directory.add_user("Carla", UserRole::Requester, true);

        let event = NotificationEvent::new(NotificationKind::RequestRejected, actor, "solicitud")
            .to_user(requester)
            .email(false);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.emailed, 1);
        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Payflow - Notificación");
        assert!(sent[0].body.contains("RECHAZADA"));
        assert!(!sent[0].body.contains("<strong>"));
    }

    #[tokio::test]
    async fn test_normal_priority_without_email_flag_skips_mailer() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);
        let approver = h.directory.add_user("Ana", UserRole::Approver, true);

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_user(approver);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.emailed, 0);
    }

    #[tokio::test]
    async fn test_insert_failure_is_isolated_per_recipient() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);
        let good = h.directory.add_user("Admin A", UserRole::AdminGeneral, true);
        let bad = h.directory.add_user("Admin B", UserRole::AdminGeneral, true);
        *h.store.fail_for.lock().unwrap() = Some(bad);

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_role(UserRole::AdminGeneral);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.recipients, 2);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].recipient_id, good);
    }

    #[tokio::test]
    async fn test_push_failure_does_not_block_persistence_or_email() {
        let h = harness();
        let actor = h.directory.add_user("Banca", UserRole::BankPayer, true);
        let requester = h.directory.add_user("Carla", UserRole::Requester, true);
        *h.push.fail.lock().unwrap() = true;

        let event = NotificationEvent::new(NotificationKind::RequestPaid, actor, "solicitud")
            .to_user(requester);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.pushed, 0);
        assert_eq!(summary.emailed, 1);
    }

    #[tokio::test]
    async fn test_push_disabled_on_event() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);
        let admin = h.directory.add_user("Root", UserRole::AdminGeneral, true);

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_user(admin)
            .push(false);
        let summary = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.pushed, 0);
        assert!(h.push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_emitter_aborts() {
        let h = harness();
        let admin = h.directory.add_user("Root", UserRole::AdminGeneral, true);

        let event =
            NotificationEvent::new(NotificationKind::RequestCreated, Uuid::new_v4(), "solicitud")
                .to_user(admin);
        let err = h.dispatcher.try_dispatch(&event).await.unwrap_err();
        assert!(matches!(err, DispatchError::EmitterNotFound(_)));
    }

    #[tokio::test]
    async fn test_unresolvable_recipient_is_absorbed_by_dispatch() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_user(Uuid::new_v4());
        assert!(h.dispatcher.dispatch(&event).await.is_none());
        assert!(h.store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_directory_outage_is_absorbed_by_dispatch() {
        let h = harness();
        let actor = h.directory.add_user("Pedro", UserRole::Requester, true);
        h.directory.add_user("Root", UserRole::AdminGeneral, true);
        *h.directory.fail_lookups.lock().unwrap() = true;

        let event = NotificationEvent::new(NotificationKind::RequestCreated, actor, "solicitud")
            .to_role(UserRole::AdminGeneral);
        assert!(h.dispatcher.dispatch(&event).await.is_none());
        assert!(h.store.records.lock().unwrap().is_empty());
        assert!(h.push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fanout_messages_are_recipient_specific() {
        let h = harness();
        let actor = h.directory.add_user("Ana", UserRole::Approver, true);
        let requester = h.directory.add_user("Carla", UserRole::Requester, true);

        let approve = |to: Uuid| {
            NotificationEvent::new(NotificationKind::RequestApproved, actor, "solicitud")
                .to_user(to)
        };
        h.dispatcher.try_dispatch(&approve(requester)).await.unwrap();
        let payer = h.directory.add_user("Banca", UserRole::BankPayer, true);
        h.dispatcher.try_dispatch(&approve(payer)).await.unwrap();

        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].message, records[1].message);
    }
}
