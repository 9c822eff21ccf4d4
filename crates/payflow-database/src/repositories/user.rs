//! User directory repository implementation.
//!
//! Read-only: user accounts are written by the user-management
//! collaborator; the notification engine only resolves recipients.

use sqlx::PgPool;
use uuid::Uuid;

use payflow_core::error::{AppError, ErrorKind};
use payflow_core::result::AppResult;
use payflow_entity::user::{UserProfile, UserRole};

/// Repository for user directory lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a single user by id.
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, role, department, active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// List all active users holding a role, in natural storage order.
    pub async fn find_active_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, role, department, active FROM users \
             WHERE role = $1 AND active = TRUE",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find users by role", e))
    }
}
