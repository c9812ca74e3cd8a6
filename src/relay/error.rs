//! Relay service error definitions.
//!
//! Nothing here is process-fatal: the relay keeps running across
//! individual connection failures indefinitely.

use thiserror::Error;

/// Errors surfaced by the relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    /// Message received from an unregistered connection identifier;
    /// recovered locally by dropping the message
    #[error("message received from unregistered connection '{connection_id}'")]
    Protocol { connection_id: String },

    /// Failed to allocate an identifier or register a new connection;
    /// fatal to that single connection attempt only
    #[error("failed to register connection: {reason}")]
    Initialization { reason: String },

    /// Outbound frame could not be encoded
    #[error("failed to encode outbound frame: {0}")]
    Serialization(#[from] serde_json::Error),
}
