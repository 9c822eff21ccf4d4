//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the approval workflow.
///
/// The wire names are the historical Spanish tags carried by the user
/// directory; they drive both notification addressing and message phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    /// Oversees the whole platform and receives audit-style notifications.
    #[sqlx(rename = "admin_general")]
    #[serde(rename = "admin_general")]
    AdminGeneral,
    /// Submits payment and travel-expense requests.
    #[sqlx(rename = "solicitante")]
    #[serde(rename = "solicitante")]
    Requester,
    /// Authorizes or rejects submitted requests.
    #[sqlx(rename = "aprobador")]
    #[serde(rename = "aprobador")]
    Approver,
    /// Executes bank payments for authorized requests.
    #[sqlx(rename = "pagador_banca")]
    #[serde(rename = "pagador_banca")]
    BankPayer,
}

impl UserRole {
    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminGeneral => "admin_general",
            Self::Requester => "solicitante",
            Self::Approver => "aprobador",
            Self::BankPayer => "pagador_banca",
        }
    }

    /// Human-readable label used inside rendered messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AdminGeneral => "Administrador",
            Self::Requester => "Solicitante",
            Self::Approver => "Aprobador",
            Self::BankPayer => "Pagador",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = payflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin_general" => Ok(Self::AdminGeneral),
            "solicitante" => Ok(Self::Requester),
            "aprobador" => Ok(Self::Approver),
            "pagador_banca" => Ok(Self::BankPayer),
            _ => Err(payflow_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin_general, solicitante, aprobador, pagador_banca"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "admin_general".parse::<UserRole>().unwrap(),
            UserRole::AdminGeneral
        );
        assert_eq!(
            "SOLICITANTE".parse::<UserRole>().unwrap(),
            UserRole::Requester
        );
        assert!("invalid".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_wire_names_round_trip() {
        for role in [
            UserRole::AdminGeneral,
            UserRole::Requester,
            UserRole::Approver,
            UserRole::BankPayer,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }
}
