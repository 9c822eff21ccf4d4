//! Priority classification policy.

use payflow_entity::notification::{NotificationKind, Priority};

/// Map a notification kind to its urgency level.
///
/// A static policy table, not a runtime derivation: changing it changes
/// behavior for future notifications only. Rejections and payments are
/// user-facing urgent; welcome and account-bookkeeping events are
/// background noise; anything unmapped defaults to normal.
pub fn classify(kind: NotificationKind) -> Priority {
    use NotificationKind::*;

    match kind {
        SystemAlert => Priority::Critical,

        RequestRejected | RequestPaid | TravelRejected | TravelPaid | RecurringRejected
        | ReceiptRejected | BatchRejected | BatchPaid | SystemMaintenance => Priority::High,

        RequestCreated | RequestApproved | TravelCreated | TravelApproved | RecurringCreated
        | RecurringApproved | RecurringExecuted | ReceiptUploaded | ReceiptApproved
        | BatchApproved => Priority::Normal,

        UserCreated | UserWelcome => Priority::Low,

        // Everything else, including the generic action fallback.
        RequestUpdated | RequestDeleted | UserUpdated | UserDeleted | SystemAction => {
            Priority::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_and_payments_are_high() {
        assert_eq!(classify(NotificationKind::RequestRejected), Priority::High);
        assert_eq!(classify(NotificationKind::RequestPaid), Priority::High);
        assert_eq!(classify(NotificationKind::TravelRejected), Priority::High);
        assert_eq!(classify(NotificationKind::BatchPaid), Priority::High);
    }

    #[test]
    fn test_alerts_are_critical() {
        assert_eq!(classify(NotificationKind::SystemAlert), Priority::Critical);
    }

    #[test]
    fn test_informational_events_are_low_or_normal() {
        assert_eq!(classify(NotificationKind::UserWelcome), Priority::Low);
        assert_eq!(classify(NotificationKind::UserCreated), Priority::Low);
        assert_eq!(classify(NotificationKind::RequestCreated), Priority::Normal);
        assert_eq!(classify(NotificationKind::RequestApproved), Priority::Normal);
    }

    #[test]
    fn test_unmapped_kinds_default_to_normal() {
        assert_eq!(classify(NotificationKind::SystemAction), Priority::Normal);
        assert_eq!(classify(NotificationKind::UserDeleted), Priority::Normal);
    }
}
