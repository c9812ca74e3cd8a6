//! Registry abstraction owned by the domain layer.
//!
//! The relay service depends on this trait, not on a concrete store
//! (dependency inversion). The in-memory implementation lives in the
//! infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::Connection,
    error::RegistryError,
    value_object::ConnectionId,
};

/// The set of all currently open connections.
///
/// Invariant: a connection appears in the registry iff its transport is
/// currently open, and identifiers are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register an open connection.
    ///
    /// # Errors
    ///
    /// Rejects duplicate identifiers and connections that are not `Open`.
    async fn insert(&self, connection: Connection) -> Result<(), RegistryError>;

    /// Remove a connection, returning it if it was registered.
    ///
    /// Idempotent: removing an unknown identifier returns `None`.
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// Whether the identifier is currently registered.
    async fn contains(&self, connection_id: &ConnectionId) -> bool;

    /// Clone of the current membership, taken at a single point in time.
    ///
    /// Broadcast iterates this snapshot so it never observes a mutating
    /// collection.
    async fn snapshot(&self) -> Vec<Connection>;

    /// Number of registered connections.
    async fn count(&self) -> usize;
}
