//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::ConnectionSummaryDto, time::timestamp_to_rfc3339,
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List the currently registered connections
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ConnectionSummaryDto>> {
    let mut connections: Vec<ConnectionSummaryDto> = state
        .registry
        .snapshot()
        .await
        .iter()
        .map(|connection| ConnectionSummaryDto {
            connection_id: connection.id.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(connection.connected_at.value()),
        })
        .collect();

    // Sort by connection_id for consistent ordering
    connections.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));

    Json(connections)
}
