//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use payflow_core::error::{AppError, ErrorKind};
use payflow_core::result::AppResult;
use payflow_entity::notification::model::{
    EnrichedNotification, NotificationRecord, NotificationStats,
};
use payflow_entity::notification::{NotificationKind, Priority};

/// Read lists are sorted by urgency first, then unread before read, then
/// newest first. Matches the ordering contract of the original platform.
const LIST_ORDER: &str = "ORDER BY \
     CASE n.priority \
       WHEN 'critica' THEN 1 \
       WHEN 'alta' THEN 2 \
       WHEN 'normal' THEN 3 \
       WHEN 'baja' THEN 4 \
     END ASC, \
     n.read ASC, \
     n.created_at DESC";

/// Repository for notification persistence and per-user queries.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification row. `id` and `created_at` are server-assigned.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        recipient_id: Uuid,
        message: &str,
        kind: NotificationKind,
        priority: Priority,
        entity_type: &str,
        entity_id: Option<&str>,
        actor_id: Uuid,
        payload: Option<&serde_json::Value>,
    ) -> AppResult<NotificationRecord> {
        sqlx::query_as::<_, NotificationRecord>(
            "INSERT INTO notifications \
               (recipient_id, message, kind, priority, entity_type, entity_id, actor_id, payload) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(recipient_id)
        .bind(message)
        .bind(kind)
        .bind(priority)
        .bind(entity_type)
        .bind(entity_id)
        .bind(actor_id)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert notification", e))
    }

    /// List notifications for a user.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<NotificationRecord>> {
        sqlx::query_as::<_, NotificationRecord>(&format!(
            "SELECT n.* FROM notifications n WHERE n.recipient_id = $1 {LIST_ORDER} LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    /// List notifications joined with the emitter's identity.
    pub async fn list_enriched(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<EnrichedNotification>> {
        sqlx::query_as::<_, EnrichedNotification>(&format!(
            "SELECT n.id, n.message, n.kind, n.priority, n.entity_type, n.entity_id, \
                    n.read, n.created_at, u.name AS actor_name, u.role::text AS actor_role \
             FROM notifications n \
             LEFT JOIN users u ON u.id = n.actor_id \
             WHERE n.recipient_id = $1 {LIST_ORDER} LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list enriched notifications", e)
        })
    }

    /// Aggregate unread/priority counters for a user.
    pub async fn stats(&self, user_id: Uuid) -> AppResult<NotificationStats> {
        sqlx::query_as::<_, NotificationStats>(
            "SELECT \
               COUNT(*) AS total, \
               COUNT(*) FILTER (WHERE NOT read) AS unread, \
               COUNT(*) FILTER (WHERE NOT read AND priority = 'alta') AS unread_high, \
               COUNT(*) FILTER (WHERE NOT read AND priority = 'critica') AS unread_critical, \
               COUNT(*) FILTER (WHERE NOT read AND kind::text LIKE 'solicitud%') AS pending_requests, \
               COUNT(*) FILTER (WHERE NOT read AND kind::text LIKE 'viatico%') AS pending_travel \
             FROM notifications WHERE recipient_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute notification stats", e)
        })
    }

    /// Mark a notification as read. Idempotent: re-marking a read row is a
    /// no-op success.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND recipient_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(())
    }

    /// Mark all unread notifications as read for a user.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND NOT read")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark all read", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Delete a notification owned by `user_id`. Returns the number of rows
    /// removed; zero means the row does not exist or belongs to someone else.
    pub async fn delete_owned(&self, notification_id: Uuid, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected())
    }
}
