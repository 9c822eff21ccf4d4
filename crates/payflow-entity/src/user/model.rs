//! User profile entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A user profile as seen by the notification engine.
///
/// Owned by the user-management subsystem; this backend reads profiles
/// to address notifications but never writes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address used by the email channel.
    pub email: String,
    /// Workflow role.
    pub role: UserRole,
    /// Department name (optional).
    pub department: Option<String>,
    /// Whether the account is active. Only active users are eligible
    /// role-addressed recipients.
    pub active: bool,
}

impl UserProfile {
    /// Department name with the placeholder used in rendered messages.
    pub fn department_label(&self) -> &str {
        self.department.as_deref().unwrap_or("Sin departamento")
    }
}
