//! Route table.

use std::{path::Path, sync::Arc};

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::ui::{
    handler::{health_check, list_sessions, websocket_handler},
    state::AppState,
};

/// Build the application router.
///
/// Anything that is not an API or WebSocket route is served from
/// `static_dir`.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/sessions", get(list_sessions))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
