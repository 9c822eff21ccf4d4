//! Recipient resolution.

use std::sync::Arc;

use tracing::debug;

use payflow_entity::user::UserProfile;

use crate::error::DispatchError;
use crate::event::Recipient;
use crate::store::UserDirectory;

/// Resolves a dispatch address into the concrete recipient profiles.
#[derive(Clone)]
pub struct RecipientResolver {
    directory: Arc<dyn UserDirectory>,
}

impl RecipientResolver {
    /// Create a new resolver over a user directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve an address into recipient profiles.
    ///
    /// An explicit user that is missing or inactive yields an empty list —
    /// the caller treats empty as a no-op, not an error. A storage-level
    /// lookup failure propagates as [`DispatchError::Resolution`].
    pub async fn resolve(
        &self,
        recipient: &Option<Recipient>,
    ) -> Result<Vec<UserProfile>, DispatchError> {
        match recipient {
            Some(Recipient::User(id)) => {
                let profile = self.directory.user_by_id(*id).await?;
                match profile {
                    Some(p) if p.active => Ok(vec![p]),
                    Some(p) => {
                        debug!(user_id = %p.id, "Explicit recipient is inactive, skipping");
                        Ok(Vec::new())
                    }
                    None => Ok(Vec::new()),
                }
            }
            Some(Recipient::Role(role)) => {
                let users = self.directory.active_users_by_role(*role).await?;
                Ok(users)
            }
            None => Ok(Vec::new()),
        }
    }
}
