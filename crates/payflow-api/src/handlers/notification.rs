//! Notification inbox handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use payflow_entity::notification::model::{
    EnrichedNotification, NotificationRecord, NotificationStats,
};

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Optional listing parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size; server default applies when absent.
    pub limit: Option<i64>,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationRecord>>>, ApiError> {
    let rows = state
        .notification_service
        .list(&auth, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/notifications/enriched
pub async fn list_enriched(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<EnrichedNotification>>>, ApiError> {
    let rows = state
        .notification_service
        .list_enriched(&auth, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/notifications/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<NotificationStats>>, ApiError> {
    let stats = state.notification_service.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Marcada como leída" } }),
    ))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let marked = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "marked": marked } }),
    ))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Notificación eliminada" } }),
    ))
}
