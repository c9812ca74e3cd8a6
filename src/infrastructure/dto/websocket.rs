//! WebSocket wire frames for the relay.
//!
//! Inbound, clients send `user-message` frames; the relay answers with
//! `message` frames fanned out to every registered connection, and a
//! single `connected` frame right after the handshake carrying the
//! server-assigned identifier.

use serde::{Deserialize, Serialize};

/// Wire event name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    UserMessage,
    Message,
    Connected,
}

/// Inbound frame: a client asks the relay to broadcast `payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessageFrame {
    pub r#type: EventType,
    pub payload: String,
}

/// Outbound frame: one broadcast copy delivered to a recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageFrame {
    pub r#type: EventType,
    pub payload: String,
}

impl MessageFrame {
    /// Build the broadcast frame for an opaque payload.
    pub fn broadcast(payload: String) -> Self {
        Self {
            r#type: EventType::Message,
            payload,
        }
    }
}

/// Outbound frame: handshake acknowledgment carrying the assigned
/// connection identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedFrame {
    pub r#type: EventType,
    pub connection_id: String,
}

impl ConnectedFrame {
    /// Build the handshake acknowledgment for a fresh connection.
    pub fn new(connection_id: String) -> Self {
        Self {
            r#type: EventType::Connected,
            connection_id,
        }
    }
}
