//! Server state shared across handlers.

use std::sync::Arc;

use crate::{domain::ConnectionRegistry, relay::RelayService};

/// Shared application state
pub struct AppState {
    /// The relay service owning connect/broadcast/disconnect
    pub relay: Arc<RelayService>,
    /// Registry handle for the observability endpoints
    pub registry: Arc<dyn ConnectionRegistry>,
}

impl AppState {
    /// Build the state around one registry instance; the relay service
    /// and the HTTP surface share it.
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            relay: Arc::new(RelayService::new(registry.clone())),
            registry,
        }
    }
}
