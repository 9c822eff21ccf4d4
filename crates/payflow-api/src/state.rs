//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use payflow_core::config::AppConfig;
use payflow_database::repositories::{NotificationRepository, UserRepository};
use payflow_notifier::action::ActionLogger;
use payflow_notifier::channel::{HttpMailer, Mailer, PushChannel};
use payflow_notifier::dispatcher::NotificationDispatcher;
use payflow_notifier::store::{NotificationStore, UserDirectory};
use payflow_realtime::PushHub;
use payflow_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// User repository.
    pub user_repo: Arc<UserRepository>,
    /// Notification repository.
    pub notif_repo: Arc<NotificationRepository>,
    /// Inbox read/update service.
    pub notification_service: Arc<NotificationService>,
    /// The dispatch engine.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Audit action logger.
    pub action_logger: Arc<ActionLogger>,
    /// Live WebSocket registry.
    pub push_hub: Arc<PushHub>,
}

impl AppState {
    /// Wire the full dependency graph over a connected pool.
    ///
    /// The email channel is only attached when a mail relay endpoint is
    /// configured; the push channel is always attached.
    pub fn build(config: Arc<AppConfig>, db_pool: PgPool) -> Self {
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let notif_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
        let push_hub = Arc::new(PushHub::new(config.notifier.push_buffer_size));

        let directory: Arc<dyn UserDirectory> = user_repo.clone();
        let store: Arc<dyn NotificationStore> = notif_repo.clone();
        let push: Arc<dyn PushChannel> = push_hub.clone();
        let mailer: Option<Arc<dyn Mailer>> = if config.notifier.mail_endpoint.is_empty() {
            None
        } else {
            Some(Arc::new(HttpMailer::new(
                config.notifier.mail_endpoint.clone(),
                config.notifier.mail_from.clone(),
            )))
        };

        let dispatcher = Arc::new(NotificationDispatcher::new(
            directory.clone(),
            store.clone(),
            Some(push.clone()),
            mailer,
            config.notifier.clone(),
        ));
        let action_logger = Arc::new(ActionLogger::new(
            dispatcher.clone(),
            directory,
            store,
            Some(push),
        ));
        let notification_service = Arc::new(NotificationService::new(
            notif_repo.clone(),
            config.notifier.list_limit,
        ));

        Self {
            config,
            db_pool,
            user_repo,
            notif_repo,
            notification_service,
            dispatcher,
            action_logger,
            push_hub,
        }
    }
}
