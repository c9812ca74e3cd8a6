//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },
}

/// Errors related to the per-connection state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionStateError {
    /// The connection already completed its handshake
    #[error("connection is already open")]
    AlreadyOpen,

    /// Closed is terminal; a closed connection is never reused
    #[error("connection is closed and cannot be reopened")]
    Closed,
}

/// Errors related to registry mutations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection with the same identifier is already registered
    #[error("connection '{0}' is already registered")]
    DuplicateConnectionId(String),

    /// Only open connections may enter the registry
    #[error("connection '{0}' is not open")]
    ConnectionNotOpen(String),
}

/// A send to one recipient's transport failed (peer channel closed).
///
/// Recovered locally during broadcast: logged, then delivery continues
/// for the remaining recipients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport channel for connection '{connection_id}' is closed")]
pub struct TransportSendError {
    /// Identifier of the recipient whose transport rejected the send
    pub connection_id: String,
}
