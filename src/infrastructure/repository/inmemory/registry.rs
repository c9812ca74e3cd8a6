//! In-memory ConnectionRegistry implementation.
//!
//! A HashMap behind a tokio Mutex. Handlers run on a multi-threaded
//! runtime, so every insert/remove/iterate takes the lock, and broadcast
//! works from a cloned snapshot rather than holding the lock across
//! sends.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, RegistryError};

/// In-memory registry of open connections, keyed by identifier.
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn insert(&self, connection: Connection) -> Result<(), RegistryError> {
        if !connection.is_open() {
            return Err(RegistryError::ConnectionNotOpen(
                connection.id.as_str().to_string(),
            ));
        }

        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateConnectionId(
                connection.id.as_str().to_string(),
            ));
        }
        connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id).map(|mut connection| {
            connection.close();
            connection
        })
    }

    async fn contains(&self, connection_id: &ConnectionId) -> bool {
        let connections = self.connections.lock().await;
        connections.contains_key(connection_id)
    }

    async fn snapshot(&self) -> Vec<Connection> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
