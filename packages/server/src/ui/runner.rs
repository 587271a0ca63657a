//! Server startup.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::{
    config::Config,
    error::ServerError,
    hub::Hub,
    ui::{router::create_router, signal::shutdown_signal, state::AppState},
    usecase::default_registry,
};

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let registry = default_registry();
    tracing::debug!("handlers: {:?}", registry);
    let hub = Arc::new(Hub::new(Arc::new(registry), config.hub_config()));
    let app = create_router(AppState::new(hub), &config.static_dir);

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    tracing::info!("Listening on {}", config.addr);
    if config.hub_config().auth_timeout.is_none() {
        tracing::debug!(
            "no authentication timeout configured; unauthenticated sessions wait forever"
        );
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}
