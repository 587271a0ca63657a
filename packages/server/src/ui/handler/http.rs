//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use switchboard_shared::time::timestamp_to_jst_rfc3339;

use crate::ui::state::AppState;

/// Authenticated session as exposed over HTTP
#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub identity: String,
    /// RFC 3339, JST
    pub connected_at: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List authenticated sessions
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionDto>> {
    let sessions = state
        .hub
        .snapshot()
        .await
        .into_iter()
        .map(|summary| SessionDto {
            identity: summary.identity.into_string(),
            connected_at: timestamp_to_jst_rfc3339(summary.connected_at),
        })
        .collect();

    Json(sessions)
}
