//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use payflow_realtime::OutboundMessage;

use crate::error::ApiError;
use crate::extractors::auth::decode_token;
use crate::state::AppState;

/// Query parameter for WebSocket authentication. Browsers cannot set an
/// Authorization header on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrading.
    let claims = decode_token(&query.token, &state.config.auth)?;
    let user_id = claims.sub;

    Ok(ws.on_upgrade(move |socket| handle_connection(state, user_id, socket)))
}

/// Drives one established WebSocket connection until it closes.
async fn handle_connection(state: AppState, user_id: Uuid, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (conn_id, mut outbound_rx) = state.push_hub.register(user_id);

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection established");

    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                // The only inbound message clients send is a heartbeat.
                if text.as_str().trim() == "ping" {
                    if let Ok(pong) = OutboundMessage::Pong.to_json() {
                        let _ = state.push_hub.deliver_raw(user_id, conn_id, pong);
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.push_hub.unregister(user_id, conn_id);

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection closed");
}
