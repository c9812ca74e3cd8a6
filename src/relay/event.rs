//! Transport events consumed by the relay.
//!
//! The transport layer delivers exactly three events; they are routed
//! through [`RelayService::handle_event`](super::RelayService::handle_event)
//! as a tagged union rather than per-event callbacks.

use crate::domain::{ConnectionId, Payload, TransportHandle};

/// One event delivered by the transport layer.
#[derive(Debug, Clone)]
pub enum RelayEvent {
    /// A client completed the transport handshake.
    Connect {
        /// Handle for pushing outbound frames to the new client
        transport: TransportHandle,
    },
    /// A registered client sent a message to broadcast.
    Message {
        connection_id: ConnectionId,
        payload: Payload,
    },
    /// The transport reported disconnection or error for a client.
    Disconnect { connection_id: ConnectionId },
}

/// Result of processing one [`RelayEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The connection was registered under this identifier
    Connected(ConnectionId),
    /// The payload was fanned out to this many recipients
    Broadcast { recipients: usize },
    /// The connection is no longer registered
    Disconnected,
}
