//! Notification priority levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency level of a notification.
///
/// Drives the email-escalation policy and the default read-list ordering.
/// Wire names match the values persisted by the original platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_priority")]
pub enum Priority {
    /// Background events (welcome messages, account bookkeeping).
    #[sqlx(rename = "baja")]
    #[serde(rename = "baja")]
    Low,
    /// Standard workflow events.
    #[sqlx(rename = "normal")]
    #[serde(rename = "normal")]
    Normal,
    /// User-facing urgency: rejections and payments.
    #[sqlx(rename = "alta")]
    #[serde(rename = "alta")]
    High,
    /// System-level alerts.
    #[sqlx(rename = "critica")]
    #[serde(rename = "critica")]
    Critical,
}

impl Priority {
    /// Return the priority as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Normal => "normal",
            Self::High => "alta",
            Self::Critical => "critica",
        }
    }

    /// Sort rank for read lists: lower comes first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Normal => 3,
            Self::Low => 4,
        }
    }

    /// Whether this priority escalates delivery to the email channel
    /// regardless of the caller's preference.
    pub fn forces_email(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        assert!(Priority::Critical.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Normal.rank());
        assert!(Priority::Normal.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_email_escalation() {
        assert!(Priority::High.forces_email());
        assert!(Priority::Critical.forces_email());
        assert!(!Priority::Normal.forces_email());
        assert!(!Priority::Low.forces_email());
    }
}
