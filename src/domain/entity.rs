//! Core domain model: one live connection.

use tokio::sync::mpsc::UnboundedSender;

use super::{
    error::{ConnectionStateError, TransportSendError},
    value_object::{ConnectionId, Timestamp},
};

/// Handle used to push outbound text frames to one connection's transport.
///
/// Sends are fire-and-forget from the relay's perspective; the transport
/// layer governs its own buffering.
pub type TransportHandle = UnboundedSender<String>;

/// Lifecycle states of a connection.
///
/// `Closed` is terminal. A reconnecting client is an entirely new
/// connection with a new identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport handshake not yet completed
    Connecting,
    /// Handshake completed, connection registered
    Open,
    /// Transport reported disconnection or error
    Closed,
}

/// Represents one live client link.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Unique identifier assigned for the lifetime of the connection
    pub id: ConnectionId,
    /// Timestamp when the transport handshake completed
    pub connected_at: Timestamp,
    transport: TransportHandle,
    state: ConnectionState,
}

impl Connection {
    /// Create a new connection in the `Connecting` state.
    pub fn new(id: ConnectionId, transport: TransportHandle, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            transport,
            state: ConnectionState::Connecting,
        }
    }

    /// Transition to `Open` on a successful handshake.
    ///
    /// # Errors
    ///
    /// Returns an error unless the connection is currently `Connecting`.
    pub fn open(&mut self) -> Result<(), ConnectionStateError> {
        match self.state {
            ConnectionState::Connecting => {
                self.state = ConnectionState::Open;
                Ok(())
            }
            ConnectionState::Open => Err(ConnectionStateError::AlreadyOpen),
            ConnectionState::Closed => Err(ConnectionStateError::Closed),
        }
    }

    /// Transition to `Closed`. Terminal and idempotent.
    pub fn close(&mut self) {
        self.state = ConnectionState::Closed;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the connection is in the `Open` state.
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Push one outbound text frame to this connection's transport.
    ///
    /// # Errors
    ///
    /// Returns `TransportSendError` if the peer channel is closed.
    pub fn send(&self, frame: &str) -> Result<(), TransportSendError> {
        self.transport
            .send(frame.to_string())
            .map_err(|_| TransportSendError {
                connection_id: self.id.as_str().to_string(),
            })
    }
}
