//! Per-role message synthesis.
//!
//! One domain event reads differently per audience: an approval is a
//! celebratory first-person message to the requester, an operational
//! "ready to pay" instruction to a bank payer, and an audit summary to an
//! admin. Messages are rendered once per recipient at dispatch time and
//! persisted as-is, so historical wording survives later role changes.
//!
//! Rendering never fails: any kind without a dedicated branch, or any role
//! without a sub-branch, falls back to a generic line, and missing detail
//! fields degrade to explicit placeholders.

use chrono::Utc;

use payflow_entity::notification::{EventDetails, NotificationKind};
use payflow_entity::user::{UserProfile, UserRole};

/// Render the message for one recipient.
pub fn synthesize(
    kind: NotificationKind,
    actor: &UserProfile,
    recipient: &UserProfile,
    details: &EventDetails,
) -> String {
    let emoji = emoji_for(kind);
    let actor_name = actor.name.as_str();
    let actor_dept = actor.department_label();

    match kind {
        NotificationKind::RequestCreated => {
            let f = RequestFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> ({}) de <strong>{actor_dept}</strong> \
                     creó una nueva solicitud por <strong>{}</strong>\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>🏢 <strong>Empresa:</strong> {}\
                     <br>📅 <strong>Límite de pago:</strong> {}",
                    actor.role.label(),
                    f.money,
                    f.concept,
                    f.company,
                    f.deadline
                ),
                UserRole::Approver => format!(
                    "{emoji} Nueva solicitud para revisar de <strong>{actor_name}</strong> ({actor_dept})\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>⏰ <strong>Requiere aprobación</strong>",
                    f.money, f.concept
                ),
                _ => format!(
                    "{emoji} Tu solicitud por <strong>{}</strong> fue registrada exitosamente\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>⏳ <strong>Estado:</strong> Pendiente de aprobación",
                    f.money, f.concept
                ),
            }
        }

        NotificationKind::RequestApproved => {
            let f = RequestFields::from(details);
            match recipient.role {
                UserRole::Requester => format!(
                    "{emoji} ¡Tu solicitud por <strong>{}</strong> fue <strong>APROBADA</strong> \
                     por <strong>{actor_name}</strong>!\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>💳 <strong>Próximo paso:</strong> Procesamiento de pago",
                    f.money, f.concept
                ),
                UserRole::BankPayer => format!(
                    "{emoji} Nueva solicitud <strong>AUTORIZADA</strong> para procesar pago\
                     <br>👤 <strong>Solicitante:</strong> {} ({})\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>✅ <strong>Aprobada por:</strong> {actor_name}",
                    f.requester, f.requester_dept, f.money, f.concept
                ),
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> aprobó la solicitud de <strong>{}</strong>\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🏢 <strong>Departamento:</strong> {}",
                    f.requester, f.money, f.requester_dept
                ),
                _ => format!(
                    "{emoji} Aprobaste la solicitud de <strong>{}</strong> por <strong>{}</strong>",
                    f.requester, f.money
                ),
            }
        }

        NotificationKind::RequestRejected => {
            let f = RequestFields::from(details);
            match recipient.role {
                UserRole::Requester => {
                    let reason = f
                        .comment
                        .map(|c| format!("<br>📝 <strong>Motivo:</strong> {c}"))
                        .unwrap_or_default();
                    format!(
                        "{emoji} Tu solicitud por <strong>{}</strong> fue \
                         <strong>RECHAZADA</strong> por <strong>{actor_name}</strong>{reason}\
                         <br>📋 <strong>Concepto:</strong> {}\
                         <br>💡 <strong>Puedes crear una nueva solicitud corrigiendo los aspectos indicados</strong>",
                        f.money, f.concept
                    )
                }
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> rechazó la solicitud de <strong>{}</strong>\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>📝 <strong>Motivo:</strong> {}",
                    f.requester,
                    f.money,
                    f.comment.unwrap_or("Sin especificar")
                ),
                _ => format!(
                    "{emoji} Rechazaste la solicitud de <strong>{}</strong> por <strong>{}</strong>",
                    f.requester, f.money
                ),
            }
        }

        NotificationKind::RequestPaid => {
            let f = RequestFields::from(details);
            match recipient.role {
                UserRole::Requester => format!(
                    "{emoji} ¡Tu solicitud por <strong>{}</strong> ha sido <strong>PAGADA</strong>!\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>💳 <strong>Cuenta destino:</strong> {}\
                     <br>🏦 <strong>Procesado por:</strong> {actor_name}\
                     <br>📅 <strong>Fecha de pago:</strong> {}",
                    f.money,
                    f.concept,
                    f.account,
                    today()
                ),
                UserRole::Approver => format!(
                    "{emoji} La solicitud que aprobaste de <strong>{}</strong> ha sido pagada\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🏦 <strong>Procesado por:</strong> {actor_name}",
                    f.requester, f.money
                ),
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> procesó el pago de la solicitud de \
                     <strong>{}</strong>\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🏢 <strong>Departamento:</strong> {}",
                    f.requester, f.money, f.requester_dept
                ),
                _ => format!(
                    "{emoji} Procesaste el pago de <strong>{}</strong> por <strong>{}</strong>",
                    f.requester, f.money
                ),
            }
        }

        NotificationKind::TravelCreated => {
            let f = TravelFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> ({actor_dept}) creó una nueva solicitud \
                     de viático\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>🎯 <strong>Destino:</strong> {}",
                    f.money, f.concept, f.destination
                ),
                UserRole::Approver => format!(
                    "{emoji} Nueva solicitud de viático para revisar de <strong>{actor_name}</strong>\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🎯 <strong>Destino:</strong> {}\
                     <br>⏰ <strong>Requiere aprobación</strong>",
                    f.money, f.destination
                ),
                _ => format!(
                    "{emoji} Tu solicitud de viático por <strong>{}</strong> fue registrada\
                     <br>🎯 <strong>Destino:</strong> {}",
                    f.money, f.destination
                ),
            }
        }

        NotificationKind::ReceiptUploaded => {
            let f = ReceiptFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> subió un comprobante\
                     <br>📄 <strong>Tipo:</strong> {}\
                     <br>🔗 <strong>Relacionado con:</strong> {}\
                     <br>📅 <strong>Fecha:</strong> {}",
                    f.receipt_type,
                    f.related,
                    today()
                ),
                UserRole::Approver => format!(
                    "{emoji} Se subió un comprobante para revisar\
                     <br>👤 <strong>Subido por:</strong> {actor_name}\
                     <br>📄 <strong>Tipo:</strong> {}",
                    f.receipt_type
                ),
                _ => format!(
                    "{emoji} Tu comprobante fue subido correctamente\
                     <br>📄 <strong>Tipo:</strong> {}",
                    f.receipt_type
                ),
            }
        }

        NotificationKind::UserCreated | NotificationKind::UserWelcome => {
            let f = AccountFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} Se creó un nuevo usuario en el sistema\
                     <br>👤 <strong>Nombre:</strong> {}\
                     <br>✉️ <strong>Email:</strong> {}\
                     <br>🎭 <strong>Rol:</strong> {}\
                     <br>🏢 <strong>Departamento:</strong> {}\
                     <br>👨‍💼 <strong>Creado por:</strong> {actor_name}",
                    f.name, f.email, f.role, f.department
                ),
                _ => format!(
                    "{emoji} ¡Bienvenido/a <strong>{}</strong>! Tu cuenta ha sido creada exitosamente\
                     <br>🎭 <strong>Rol:</strong> {}\
                     <br>🏢 <strong>Departamento:</strong> {}\
                     <br>🚀 <strong>Ya puedes comenzar a usar la plataforma</strong>",
                    f.name, f.role, f.department
                ),
            }
        }

        NotificationKind::BatchApproved => {
            let f = BatchFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> aprobó <strong>{}</strong> {}s en lote\
                     <br>💰 <strong>Monto total:</strong> {}\
                     <br>📋 <strong>Operación:</strong> Aprobación masiva",
                    f.count, f.label, f.money
                ),
                UserRole::BankPayer => format!(
                    "{emoji} <strong>{}</strong> {}s fueron aprobadas para pago\
                     <br>💰 <strong>Monto total:</strong> {}\
                     <br>✅ <strong>Aprobadas por:</strong> {actor_name}\
                     <br>⏰ <strong>Listas para procesar</strong>",
                    f.count, f.label, f.money
                ),
                _ => format!(
                    "{emoji} Aprobaste <strong>{}</strong> {}s en lote\
                     <br>💰 <strong>Monto total:</strong> {}",
                    f.count, f.label, f.money
                ),
            }
        }

        NotificationKind::BatchRejected => {
            let f = BatchFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> rechazó <strong>{}</strong> {}s en lote\
                     <br>📝 <strong>Motivo:</strong> {}\
                     <br>📋 <strong>Operación:</strong> Rechazo masivo",
                    f.count,
                    f.label,
                    f.comment.unwrap_or("Sin especificar")
                ),
                _ => format!(
                    "{emoji} Rechazaste <strong>{}</strong> {}s en lote\
                     <br>📝 <strong>Motivo:</strong> {}",
                    f.count,
                    f.label,
                    f.comment.unwrap_or("Sin especificar")
                ),
            }
        }

        NotificationKind::RecurringCreated => {
            let f = RecurringFields::from(details);
            match recipient.role {
                UserRole::AdminGeneral => format!(
                    "{emoji} <strong>{actor_name}</strong> creó una nueva plantilla de pago recurrente\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>📋 <strong>Concepto:</strong> {}\
                     <br>🔄 <strong>Frecuencia:</strong> {}\
                     <br>📅 <strong>Próxima ejecución:</strong> {}",
                    f.money, f.concept, f.frequency, f.next_run
                ),
                UserRole::Approver => format!(
                    "{emoji} Nueva plantilla recurrente para revisar de <strong>{actor_name}</strong>\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🔄 <strong>Frecuencia:</strong> {}\
                     <br>⏰ <strong>Requiere aprobación</strong>",
                    f.money, f.frequency
                ),
                _ => format!(
                    "{emoji} Tu plantilla de pago recurrente fue creada\
                     <br>💰 <strong>Monto:</strong> {}\
                     <br>🔄 <strong>Frecuencia:</strong> {}",
                    f.money, f.frequency
                ),
            }
        }

        // Everything else renders the generic line regardless of role.
        _ => format!(
            "{emoji} <strong>{actor_name}</strong> realizó una acción en el sistema\
             <br>📋 <strong>Tipo:</strong> {kind}\
             <br>📅 <strong>Fecha:</strong> {}",
            today()
        ),
    }
}

/// Format an optional amount as "$1,500" with thousands grouping, or the
/// placeholder when absent.
pub fn money(amount: Option<f64>) -> String {
    match amount {
        Some(v) => format!("${}", group_amount(v)),
        None => "—".to_string(),
    }
}

/// Thousands-grouped amount with up to two decimals, trailing zeros trimmed.
fn group_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = (cents % 100) as u8;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    };
    if frac != 0 {
        if frac % 10 == 0 {
            out.push_str(&format!(".{}", frac / 10));
        } else {
            out.push_str(&format!(".{frac:02}"));
        }
    }
    out
}

fn today() -> String {
    Utc::now().format("%d/%m/%Y").to_string()
}

fn emoji_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::RequestCreated => "📝",
        NotificationKind::RequestApproved => "✅",
        NotificationKind::RequestRejected => "❌",
        NotificationKind::RequestPaid => "💸",
        NotificationKind::TravelCreated => "🧳",
        NotificationKind::TravelApproved => "✈️",
        NotificationKind::TravelRejected => "⛔",
        NotificationKind::ReceiptUploaded => "📎",
        NotificationKind::UserCreated => "👤",
        NotificationKind::UserWelcome => "🎉",
        NotificationKind::RecurringCreated => "🔄",
        NotificationKind::RecurringApproved => "🔄✅",
        NotificationKind::BatchApproved => "✅📋",
        NotificationKind::BatchRejected => "❌📋",
        _ => "🔔",
    }
}

fn text<'a>(opt: &'a Option<String>, placeholder: &'static str) -> &'a str {
    opt.as_deref().filter(|s| !s.is_empty()).unwrap_or(placeholder)
}

struct RequestFields<'a> {
    money: String,
    concept: &'a str,
    company: &'a str,
    deadline: &'a str,
    requester: &'a str,
    requester_dept: &'a str,
    comment: Option<&'a str>,
    account: &'a str,
}

impl<'a> RequestFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Request {
            amount,
            concept,
            company,
            payment_deadline,
            requester_name,
            requester_department,
            reviewer_comment,
            target_account,
        } = details
        {
            Self {
                money: money(*amount),
                concept: text(concept, "No especificado"),
                company: text(company, "No especificada"),
                deadline: text(payment_deadline, "Sin límite"),
                requester: text(requester_name, "No especificado"),
                requester_dept: text(requester_department, "Sin departamento"),
                comment: reviewer_comment.as_deref().filter(|s| !s.is_empty()),
                account: text(target_account, "No especificada"),
            }
        } else {
            Self {
                money: money(None),
                concept: "No especificado",
                company: "No especificada",
                deadline: "Sin límite",
                requester: "No especificado",
                requester_dept: "Sin departamento",
                comment: None,
                account: "No especificada",
            }
        }
    }
}

struct TravelFields<'a> {
    money: String,
    concept: &'a str,
    destination: &'a str,
}

impl<'a> TravelFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Travel {
            amount,
            concept,
            destination,
        } = details
        {
            Self {
                money: money(*amount),
                concept: text(concept, "No especificado"),
                destination: text(destination, "No especificado"),
            }
        } else {
            Self {
                money: money(None),
                concept: "No especificado",
                destination: "No especificado",
            }
        }
    }
}

struct ReceiptFields<'a> {
    receipt_type: &'a str,
    related: &'a str,
}

impl<'a> ReceiptFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Receipt {
            receipt_type,
            related_entity,
        } = details
        {
            Self {
                receipt_type: text(receipt_type, "No especificado"),
                related: text(related_entity, "No especificado"),
            }
        } else {
            Self {
                receipt_type: "No especificado",
                related: "No especificado",
            }
        }
    }
}

struct AccountFields<'a> {
    name: &'a str,
    email: &'a str,
    role: &'a str,
    department: &'a str,
}

impl<'a> AccountFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Account {
            name,
            email,
            role,
            department,
        } = details
        {
            Self {
                name: text(name, "No especificado"),
                email: text(email, "No especificado"),
                role: text(role, "No especificado"),
                department: text(department, "Sin asignar"),
            }
        } else {
            Self {
                name: "No especificado",
                email: "No especificado",
                role: "No especificado",
                department: "Sin asignar",
            }
        }
    }
}

struct BatchFields<'a> {
    count: String,
    money: String,
    label: &'a str,
    comment: Option<&'a str>,
}

impl<'a> BatchFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Batch {
            count,
            total_amount,
            entity_label,
            comment,
        } = details
        {
            Self {
                count: count.map(|c| c.to_string()).unwrap_or_else(|| "—".into()),
                money: money(*total_amount),
                label: text(entity_label, "elemento"),
                comment: comment.as_deref().filter(|s| !s.is_empty()),
            }
        } else {
            Self {
                count: "—".into(),
                money: money(None),
                label: "elemento",
                comment: None,
            }
        }
    }
}

struct RecurringFields<'a> {
    money: String,
    concept: &'a str,
    frequency: &'a str,
    next_run: &'a str,
}

impl<'a> RecurringFields<'a> {
    fn from(details: &'a EventDetails) -> Self {
        if let EventDetails::Recurring {
            amount,
            concept,
            frequency,
            next_run,
        } = details
        {
            Self {
                money: money(*amount),
                concept: text(concept, "No especificado"),
                frequency: text(frequency, "No especificada"),
                next_run: text(next_run, "No programada"),
            }
        } else {
            Self {
                money: money(None),
                concept: "No especificado",
                frequency: "No especificada",
                next_run: "No programada",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(name: &str, role: UserRole) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role,
            department: Some("Finanzas".to_string()),
            active: true,
        }
    }

    fn request_details() -> EventDetails {
        EventDetails::Request {
            amount: Some(1500.0),
            concept: Some("viaje".to_string()),
            company: None,
            payment_deadline: None,
            requester_name: Some("Carla".to_string()),
            requester_department: Some("Ventas".to_string()),
            reviewer_comment: None,
            target_account: None,
        }
    }

    #[test]
    fn test_group_amount() {
        assert_eq!(group_amount(1500.0), "1,500");
        assert_eq!(group_amount(950.5), "950.5");
        assert_eq!(group_amount(1234567.89), "1,234,567.89");
        assert_eq!(group_amount(12.0), "12");
    }

    #[test]
    fn test_money_placeholder() {
        assert_eq!(money(None), "—");
        assert_eq!(money(Some(1500.0)), "$1,500");
    }

    #[test]
    fn test_approval_message_for_requester() {
        let actor = user("Pedro", UserRole::Approver);
        let recipient = user("Carla", UserRole::Requester);
        let msg = synthesize(
            NotificationKind::RequestApproved,
            &actor,
            &recipient,
            &request_details(),
        );
        assert!(msg.contains("APROBADA"));
        assert!(msg.contains("1,500"));
        assert!(msg.contains("viaje"));
        assert!(msg.contains("Pedro"));
    }

    #[test]
    fn test_approval_message_varies_by_role() {
        let actor = user("Pedro", UserRole::Approver);
        let details = request_details();

        let to_requester = synthesize(
            NotificationKind::RequestApproved,
            &actor,
            &user("Carla", UserRole::Requester),
            &details,
        );
        let to_payer = synthesize(
            NotificationKind::RequestApproved,
            &actor,
            &user("Banca", UserRole::BankPayer),
            &details,
        );
        let to_admin = synthesize(
            NotificationKind::RequestApproved,
            &actor,
            &user("Root", UserRole::AdminGeneral),
            &details,
        );

        assert_ne!(to_requester, to_payer);
        assert_ne!(to_requester, to_admin);
        assert_ne!(to_payer, to_admin);
        assert!(to_payer.contains("AUTORIZADA"));
        assert!(to_admin.contains("aprobó la solicitud"));
    }

    #[test]
    fn test_rejection_includes_reason_when_present() {
        let actor = user("Pedro", UserRole::Approver);
        let recipient = user("Carla", UserRole::Requester);
        let details = EventDetails::Request {
            amount: Some(200.0),
            concept: Some("papelería".to_string()),
            company: None,
            payment_deadline: None,
            requester_name: None,
            requester_department: None,
            reviewer_comment: Some("Falta factura".to_string()),
            target_account: None,
        };
        let msg = synthesize(NotificationKind::RequestRejected, &actor, &recipient, &details);
        assert!(msg.contains("RECHAZADA"));
        assert!(msg.contains("Falta factura"));
    }

    #[test]
    fn test_missing_optional_fields_render_placeholders() {
        let actor = user("Pedro", UserRole::Requester);
        let recipient = user("Root", UserRole::AdminGeneral);
        let details = EventDetails::Request {
            amount: None,
            concept: None,
            company: None,
            payment_deadline: None,
            requester_name: None,
            requester_department: None,
            reviewer_comment: None,
            target_account: None,
        };
        let msg = synthesize(NotificationKind::RequestCreated, &actor, &recipient, &details);
        assert!(msg.contains("No especificada"));
        assert!(msg.contains("Sin límite"));
        assert!(!msg.contains("undefined"));
    }

    #[test]
    fn test_unmapped_kind_uses_generic_fallback() {
        let actor = user("Pedro", UserRole::AdminGeneral);
        let recipient = user("Carla", UserRole::Requester);
        let msg = synthesize(
            NotificationKind::SystemAction,
            &actor,
            &recipient,
            &EventDetails::None,
        );
        assert!(msg.contains("Pedro"));
        assert!(msg.contains("realizó una acción"));
        assert!(msg.contains("sistema_accion"));
    }

    #[test]
    fn test_dedicated_kind_with_empty_details_never_fails() {
        let actor = user("Pedro", UserRole::Approver);
        for kind in [
            NotificationKind::RequestApproved,
            NotificationKind::TravelCreated,
            NotificationKind::ReceiptUploaded,
            NotificationKind::UserCreated,
            NotificationKind::BatchApproved,
            NotificationKind::RecurringCreated,
        ] {
            for role in [
                UserRole::AdminGeneral,
                UserRole::Requester,
                UserRole::Approver,
                UserRole::BankPayer,
            ] {
                let msg = synthesize(kind, &actor, &user("X", role), &EventDetails::None);
                assert!(!msg.is_empty());
            }
        }
    }

    #[test]
    fn test_welcome_message_for_new_user() {
        let actor = user("Root", UserRole::AdminGeneral);
        let recipient = user("Nuevo", UserRole::Requester);
        let details = EventDetails::Account {
            name: Some("Nuevo".to_string()),
            email: Some("nuevo@example.com".to_string()),
            role: Some("solicitante".to_string()),
            department: None,
        };
        let msg = synthesize(NotificationKind::UserWelcome, &actor, &recipient, &details);
        assert!(msg.contains("Bienvenido"));
        assert!(msg.contains("Sin asignar"));
    }
}
