//! Typed event detail payloads.
//!
//! The original platform shipped an open key-value bag whose schema varied
//! per notification kind. Here each payload family gets its own variant so
//! missing-field bugs surface at compile time; every field stays optional
//! because upstream callers genuinely omit them, and rendering degrades to
//! placeholders instead of failing.

use serde::{Deserialize, Serialize};

/// Event-specific details attached to a dispatch call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetails {
    /// Payment-request lifecycle events.
    Request {
        /// Requested amount.
        amount: Option<f64>,
        /// Free-text concept.
        concept: Option<String>,
        /// Company to be paid.
        company: Option<String>,
        /// Payment deadline, preformatted.
        payment_deadline: Option<String>,
        /// Name of the requester (for messages addressed to third parties).
        requester_name: Option<String>,
        /// Department of the requester.
        requester_department: Option<String>,
        /// Approver's comment, typically on rejection.
        reviewer_comment: Option<String>,
        /// Destination bank account, present on payment events.
        target_account: Option<String>,
    },
    /// Travel-expense lifecycle events.
    Travel {
        /// Requested amount.
        amount: Option<f64>,
        /// Free-text concept.
        concept: Option<String>,
        /// Trip destination.
        destination: Option<String>,
    },
    /// Recurring-template lifecycle events.
    Recurring {
        /// Amount per execution.
        amount: Option<f64>,
        /// Free-text concept.
        concept: Option<String>,
        /// Execution frequency, preformatted.
        frequency: Option<String>,
        /// Next scheduled execution date, preformatted.
        next_run: Option<String>,
    },
    /// Receipt upload/review events.
    Receipt {
        /// Receipt document type.
        receipt_type: Option<String>,
        /// Entity the receipt belongs to.
        related_entity: Option<String>,
    },
    /// User-account lifecycle events.
    Account {
        /// Name of the affected account.
        name: Option<String>,
        /// Email of the affected account.
        email: Option<String>,
        /// Role assigned to the account.
        role: Option<String>,
        /// Department assigned to the account.
        department: Option<String>,
    },
    /// Batch approve/reject/pay operations.
    Batch {
        /// Number of affected entities.
        count: Option<u32>,
        /// Sum of affected amounts.
        total_amount: Option<f64>,
        /// Label of the batched entity ("solicitud", "viático", ...).
        entity_label: Option<String>,
        /// Operator's comment, typically on rejection.
        comment: Option<String>,
    },
    /// Generic action metadata for unmapped events.
    Action {
        /// Verb describing the action.
        verb: Option<String>,
        /// Extra free-text note.
        note: Option<String>,
    },
    /// No details supplied.
    #[default]
    None,
}

impl EventDetails {
    /// Whether no details were supplied.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
