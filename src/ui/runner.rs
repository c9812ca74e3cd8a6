//! Server runner: router construction, TCP bind, graceful serve.

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use clap::Parser;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::repository::InMemoryConnectionRegistry,
    ui::{handler, signal, state::AppState},
};

/// Build the application router.
///
/// Exposed separately so integration tests can serve the exact same
/// routes on an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", any(handler::websocket_handler))
        .route("/api/health", get(handler::health_check))
        .route("/api/connections", get(handler::list_connections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the relay server with configuration from the command line.
pub async fn run_server() -> Result<(), ServerError> {
    let config = ServerConfig::parse();
    run_server_with(config).await
}

/// Run the relay server with the given configuration.
pub async fn run_server_with(config: ServerConfig) -> Result<(), ServerError> {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let state = Arc::new(AppState::new(registry));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Server is running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal::shutdown_signal())
        .await?;

    Ok(())
}
