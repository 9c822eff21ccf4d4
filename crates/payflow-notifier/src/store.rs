//! Storage seams for the dispatch engine.
//!
//! The dispatcher talks to the user directory and the notification table
//! through these traits so production wires in the sqlx repositories while
//! tests substitute in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use payflow_core::result::AppResult;
use payflow_database::repositories::{NotificationRepository, UserRepository};
use payflow_entity::notification::model::NotificationRecord;
use payflow_entity::notification::{NotificationKind, Priority};
use payflow_entity::user::{UserProfile, UserRole};

/// Read-only access to user profiles for recipient/emitter resolution.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a single user by id.
    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;

    /// All active users holding a role, in natural storage order.
    async fn active_users_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>>;
}

/// A notification row ready for insertion. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Recipient user.
    pub recipient_id: Uuid,
    /// Fully rendered, recipient-specific message.
    pub message: String,
    /// Event kind.
    pub kind: NotificationKind,
    /// Assigned priority.
    pub priority: Priority,
    /// Business entity tag.
    pub entity_type: String,
    /// Business entity identifier, if any.
    pub entity_id: Option<String>,
    /// Emitting user.
    pub actor_id: Uuid,
    /// Structured event details (JSON).
    pub payload: Option<serde_json::Value>,
}

/// Append-only access to the notification table.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist one notification row.
    async fn insert(&self, new: NewNotification) -> AppResult<NotificationRecord>;
}

/// In-memory fakes shared by the engine's unit tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use chrono::Utc;
    use payflow_core::error::AppError;
    use std::sync::Mutex;

    /// In-memory user directory.
    #[derive(Default)]
    pub struct FakeDirectory {
        users: Mutex<Vec<UserProfile>>,
        pub fail_lookups: Mutex<bool>,
    }

    impl FakeDirectory {
        pub fn add_user(&self, name: &str, role: UserRole, active: bool) -> Uuid {
            let id = Uuid::new_v4();
            self.users.lock().unwrap().push(UserProfile {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role,
                department: Some("Finanzas".to_string()),
                active,
            });
            id
        }
    }

    #[async_trait]
    impl UserDirectory for FakeDirectory {
        async fn user_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
            if *self.fail_lookups.lock().unwrap() {
                return Err(AppError::database("directory unavailable"));
            }
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn active_users_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>> {
            if *self.fail_lookups.lock().unwrap() {
                return Err(AppError::database("directory unavailable"));
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.role == role && u.active)
                .cloned()
                .collect())
        }
    }

    /// In-memory notification store.
    #[derive(Default)]
    pub struct MemoryStore {
        pub records: Mutex<Vec<NotificationRecord>>,
        /// Inserts addressed to this recipient fail, to exercise
        /// partial-success paths.
        pub fail_for: Mutex<Option<Uuid>>,
    }

    #[async_trait]
    impl NotificationStore for MemoryStore {
        async fn insert(&self, new: NewNotification) -> AppResult<NotificationRecord> {
            if *self.fail_for.lock().unwrap() == Some(new.recipient_id) {
                return Err(AppError::database("insert failed"));
            }
            let record = NotificationRecord {
                id: Uuid::new_v4(),
                recipient_id: new.recipient_id,
                message: new.message,
                kind: new.kind,
                priority: new.priority,
                entity_type: new.entity_type,
                entity_id: new.entity_id,
                actor_id: new.actor_id,
                payload: new.payload,
                read: false,
                created_at: Utc::now(),
            };
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        self.find_by_id(id).await
    }

    async fn active_users_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>> {
        self.find_active_by_role(role).await
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, new: NewNotification) -> AppResult<NotificationRecord> {
        self.insert(
            new.recipient_id,
            &new.message,
            new.kind,
            new.priority,
            &new.entity_type,
            new.entity_id.as_deref(),
            new.actor_id,
            new.payload.as_ref(),
        )
        .await
    }
}
