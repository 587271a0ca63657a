//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::stream::StreamExt;

use crate::{
    hub::CloseReason,
    infrastructure::{WebSocketTransport, inbound_frames},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One accepted connection: one session, served until it closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sink, stream) = socket.split();
    let (transport, writer) = WebSocketTransport::spawn(sink);

    let reason = state
        .hub
        .accept(Arc::new(transport), inbound_frames(stream))
        .await;
    match reason {
        CloseReason::Normal => tracing::info!("connection closed"),
        CloseReason::Violation(reason) => tracing::info!("connection closed: {}", reason),
    }

    // the hub has queued the close frame; let the writer flush it
    if let Err(e) = writer.await {
        tracing::warn!("websocket writer task failed: {}", e);
    }
}
