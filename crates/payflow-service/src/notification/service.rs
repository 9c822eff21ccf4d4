//! Notification inbox operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use payflow_core::error::AppError;
use payflow_core::result::AppResult;
use payflow_database::repositories::NotificationRepository;
use payflow_entity::notification::model::{
    EnrichedNotification, NotificationRecord, NotificationStats,
};

use crate::context::RequestContext;

/// Manages a user's notification inbox.
///
/// Every operation is scoped to the authenticated user; a user can never
/// read, mark, or delete another user's rows.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notif_repo: Arc<NotificationRepository>,
    /// Page size applied when the caller does not pass a limit.
    default_limit: i64,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>, default_limit: i64) -> Self {
        Self {
            notif_repo,
            default_limit,
        }
    }

    /// Lists the current user's notifications, urgency first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<NotificationRecord>> {
        self.notif_repo
            .list_by_user(ctx.user_id, self.effective_limit(limit))
            .await
    }

    /// Lists the current user's notifications joined with the emitter's
    /// identity, for inbox rendering.
    pub async fn list_enriched(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<EnrichedNotification>> {
        self.notif_repo
            .list_enriched(ctx.user_id, self.effective_limit(limit))
            .await
    }

    /// Unread and pending-work counters for the current user.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<NotificationStats> {
        self.notif_repo.stats(ctx.user_id).await
    }

    /// Marks one notification as read. Idempotent, and a no-op for rows
    /// the user does not own.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        self.notif_repo.mark_read(notification_id, ctx.user_id).await
    }

    /// Marks every unread notification as read, returning how many flipped.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let updated = self.notif_repo.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, updated, "Marked all notifications read");
        Ok(updated)
    }

    /// Deletes one of the current user's notifications.
    ///
    /// A row that does not exist or belongs to someone else reports not
    /// found; ownership is enforced in the delete predicate itself.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        let removed = self
            .notif_repo
            .delete_owned(notification_id, ctx.user_id)
            .await?;
        if removed == 0 {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    fn effective_limit(&self, limit: Option<i64>) -> i64 {
        match limit {
            Some(l) if l > 0 => l.min(500),
            _ => self.default_limit,
        }
    }
}
