//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The specific type of domain event being notified.
///
/// Wire names are the historical Spanish snake_case tags persisted in the
/// notification table and understood by the web frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind")]
pub enum NotificationKind {
    // Payment requests
    #[sqlx(rename = "solicitud_creada")]
    #[serde(rename = "solicitud_creada")]
    RequestCreated,
    #[sqlx(rename = "solicitud_aprobada")]
    #[serde(rename = "solicitud_aprobada")]
    RequestApproved,
    #[sqlx(rename = "solicitud_rechazada")]
    #[serde(rename = "solicitud_rechazada")]
    RequestRejected,
    #[sqlx(rename = "solicitud_pagada")]
    #[serde(rename = "solicitud_pagada")]
    RequestPaid,
    #[sqlx(rename = "solicitud_actualizada")]
    #[serde(rename = "solicitud_actualizada")]
    RequestUpdated,
    #[sqlx(rename = "solicitud_eliminada")]
    #[serde(rename = "solicitud_eliminada")]
    RequestDeleted,

    // Travel expenses
    #[sqlx(rename = "viatico_creado")]
    #[serde(rename = "viatico_creado")]
    TravelCreated,
    #[sqlx(rename = "viatico_aprobado")]
    #[serde(rename = "viatico_aprobado")]
    TravelApproved,
    #[sqlx(rename = "viatico_rechazado")]
    #[serde(rename = "viatico_rechazado")]
    TravelRejected,
    #[sqlx(rename = "viatico_pagado")]
    #[serde(rename = "viatico_pagado")]
    TravelPaid,

    // Recurring payment templates
    #[sqlx(rename = "recurrente_creada")]
    #[serde(rename = "recurrente_creada")]
    RecurringCreated,
    #[sqlx(rename = "recurrente_aprobada")]
    #[serde(rename = "recurrente_aprobada")]
    RecurringApproved,
    #[sqlx(rename = "recurrente_rechazada")]
    #[serde(rename = "recurrente_rechazada")]
    RecurringRejected,
    #[sqlx(rename = "recurrente_ejecutada")]
    #[serde(rename = "recurrente_ejecutada")]
    RecurringExecuted,

    // Receipts
    #[sqlx(rename = "comprobante_subido")]
    #[serde(rename = "comprobante_subido")]
    ReceiptUploaded,
    #[sqlx(rename = "comprobante_aprobado")]
    #[serde(rename = "comprobante_aprobado")]
    ReceiptApproved,
    #[sqlx(rename = "comprobante_rechazado")]
    #[serde(rename = "comprobante_rechazado")]
    ReceiptRejected,

    // User accounts
    #[sqlx(rename = "usuario_creado")]
    #[serde(rename = "usuario_creado")]
    UserCreated,
    #[sqlx(rename = "usuario_actualizado")]
    #[serde(rename = "usuario_actualizado")]
    UserUpdated,
    #[sqlx(rename = "usuario_eliminado")]
    #[serde(rename = "usuario_eliminado")]
    UserDeleted,
    #[sqlx(rename = "usuario_bienvenida")]
    #[serde(rename = "usuario_bienvenida")]
    UserWelcome,

    // System
    #[sqlx(rename = "sistema_mantenimiento")]
    #[serde(rename = "sistema_mantenimiento")]
    SystemMaintenance,
    #[sqlx(rename = "sistema_alerta")]
    #[serde(rename = "sistema_alerta")]
    SystemAlert,

    // Batch operations
    #[sqlx(rename = "lote_aprobado")]
    #[serde(rename = "lote_aprobado")]
    BatchApproved,
    #[sqlx(rename = "lote_rechazado")]
    #[serde(rename = "lote_rechazado")]
    BatchRejected,
    #[sqlx(rename = "lote_pagado")]
    #[serde(rename = "lote_pagado")]
    BatchPaid,

    /// Generic fallback for unmapped actions.
    #[sqlx(rename = "sistema_accion")]
    #[serde(rename = "sistema_accion")]
    SystemAction,
}

impl NotificationKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestCreated => "solicitud_creada",
            Self::RequestApproved => "solicitud_aprobada",
            Self::RequestRejected => "solicitud_rechazada",
            Self::RequestPaid => "solicitud_pagada",
            Self::RequestUpdated => "solicitud_actualizada",
            Self::RequestDeleted => "solicitud_eliminada",
            Self::TravelCreated => "viatico_creado",
            Self::TravelApproved => "viatico_aprobado",
            Self::TravelRejected => "viatico_rechazado",
            Self::TravelPaid => "viatico_pagado",
            Self::RecurringCreated => "recurrente_creada",
            Self::RecurringApproved => "recurrente_aprobada",
            Self::RecurringRejected => "recurrente_rechazada",
            Self::RecurringExecuted => "recurrente_ejecutada",
            Self::ReceiptUploaded => "comprobante_subido",
            Self::ReceiptApproved => "comprobante_aprobado",
            Self::ReceiptRejected => "comprobante_rechazado",
            Self::UserCreated => "usuario_creado",
            Self::UserUpdated => "usuario_actualizado",
            Self::UserDeleted => "usuario_eliminado",
            Self::UserWelcome => "usuario_bienvenida",
            Self::SystemMaintenance => "sistema_mantenimiento",
            Self::SystemAlert => "sistema_alerta",
            Self::BatchApproved => "lote_aprobado",
            Self::BatchRejected => "lote_rechazado",
            Self::BatchPaid => "lote_pagado",
            Self::SystemAction => "sistema_accion",
        }
    }

    /// Decode a wire string, degrading unknown tags to [`Self::SystemAction`].
    pub fn from_wire(s: &str) -> Self {
        match s {
            "solicitud_creada" => Self::RequestCreated,
            "solicitud_aprobada" => Self::RequestApproved,
            "solicitud_rechazada" => Self::RequestRejected,
            "solicitud_pagada" => Self::RequestPaid,
            "solicitud_actualizada" => Self::RequestUpdated,
            "solicitud_eliminada" => Self::RequestDeleted,
            "viatico_creado" => Self::TravelCreated,
            "viatico_aprobado" => Self::TravelApproved,
            "viatico_rechazado" => Self::TravelRejected,
            "viatico_pagado" => Self::TravelPaid,
            "recurrente_creada" => Self::RecurringCreated,
            "recurrente_aprobada" => Self::RecurringApproved,
            "recurrente_rechazada" => Self::RecurringRejected,
            "recurrente_ejecutada" => Self::RecurringExecuted,
            "comprobante_subido" => Self::ReceiptUploaded,
            "comprobante_aprobado" => Self::ReceiptApproved,
            "comprobante_rechazado" => Self::ReceiptRejected,
            "usuario_creado" => Self::UserCreated,
            "usuario_actualizado" => Self::UserUpdated,
            "usuario_eliminado" => Self::UserDeleted,
            "usuario_bienvenida" => Self::UserWelcome,
            "sistema_mantenimiento" => Self::SystemMaintenance,
            "sistema_alerta" => Self::SystemAlert,
            "lote_aprobado" => Self::BatchApproved,
            "lote_rechazado" => Self::BatchRejected,
            "lote_pagado" => Self::BatchPaid,
            _ => Self::SystemAction,
        }
    }

    /// Whether this kind represents a rejection event.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RequestRejected
                | Self::TravelRejected
                | Self::RecurringRejected
                | Self::ReceiptRejected
                | Self::BatchRejected
        )
    }

    /// Whether this kind represents a completed payment event.
    pub fn is_payment(&self) -> bool {
        matches!(
            self,
            Self::RequestPaid | Self::TravelPaid | Self::RecurringExecuted | Self::BatchPaid
        )
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for kind in [
            NotificationKind::RequestCreated,
            NotificationKind::RequestRejected,
            NotificationKind::TravelPaid,
            NotificationKind::RecurringExecuted,
            NotificationKind::BatchApproved,
            NotificationKind::SystemAction,
        ] {
            assert_eq!(NotificationKind::from_wire(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_unknown_wire_degrades() {
        assert_eq!(
            NotificationKind::from_wire("totally_unknown"),
            NotificationKind::SystemAction
        );
    }

    #[test]
    fn test_rejection_and_payment_families() {
        assert!(NotificationKind::RequestRejected.is_rejection());
        assert!(NotificationKind::BatchRejected.is_rejection());
        assert!(!NotificationKind::RequestApproved.is_rejection());
        assert!(NotificationKind::RequestPaid.is_payment());
        assert!(NotificationKind::RecurringExecuted.is_payment());
        assert!(!NotificationKind::ReceiptUploaded.is_payment());
    }
}
