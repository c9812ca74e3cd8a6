//! HTTP API response DTOs for the relay.

use serde::{Deserialize, Serialize};

/// One live connection, as reported by the connections endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSummaryDto {
    pub connection_id: String,
    pub connected_at: String, // ISO 8601
}
