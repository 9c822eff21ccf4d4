//! Health check handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::dto::ApiResponse;
use crate::state::AppState;

/// Health report body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Database reachability.
    pub database: &'static str,
    /// Users with a live WebSocket.
    pub online_users: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if database == "connected" { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        online_users: state.push_hub.online_users(),
    }))
}
