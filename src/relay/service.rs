//! The relay: connection registration and best-effort broadcast.

use std::sync::Arc;

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionIdFactory, ConnectionRegistry, Payload, Timestamp,
        TransportHandle,
    },
    infrastructure::dto::websocket::MessageFrame,
    time::get_unix_timestamp_ms,
};

use super::{
    error::RelayError,
    event::{RelayEvent, RelayOutcome},
};

/// Owns the connection registry and performs broadcasts.
///
/// Constructed once per process and shared by reference into the
/// transport wiring; there is no ambient global state.
pub struct RelayService {
    registry: Arc<dyn ConnectionRegistry>,
}

impl RelayService {
    /// Create a new RelayService backed by the given registry.
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Process one transport event.
    ///
    /// Single dispatch entry point: routes the tagged union to the
    /// connect, message, and disconnect operations.
    pub async fn handle_event(&self, event: RelayEvent) -> Result<RelayOutcome, RelayError> {
        match event {
            RelayEvent::Connect { transport } => self
                .on_connect(transport)
                .await
                .map(RelayOutcome::Connected),
            RelayEvent::Message {
                connection_id,
                payload,
            } => self
                .on_message(connection_id, payload)
                .await
                .map(|recipients| RelayOutcome::Broadcast { recipients }),
            RelayEvent::Disconnect { connection_id } => {
                self.on_disconnect(connection_id).await;
                Ok(RelayOutcome::Disconnected)
            }
        }
    }

    /// Register a new connection and assign it a unique identifier.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Initialization` if identifier generation or
    /// registry insertion fails. Fatal to this connection attempt only;
    /// existing connections are unaffected.
    pub async fn on_connect(
        &self,
        transport: TransportHandle,
    ) -> Result<ConnectionId, RelayError> {
        let connection_id =
            ConnectionIdFactory::generate().map_err(|err| RelayError::Initialization {
                reason: err.to_string(),
            })?;

        let mut connection = Connection::new(
            connection_id.clone(),
            transport,
            Timestamp::new(get_unix_timestamp_ms()),
        );
        connection
            .open()
            .map_err(|err| RelayError::Initialization {
                reason: err.to_string(),
            })?;

        self.registry
            .insert(connection)
            .await
            .map_err(|err| RelayError::Initialization {
                reason: err.to_string(),
            })?;

        tracing::info!(connection_id = %connection_id, "connection registered");
        Ok(connection_id)
    }

    /// Broadcast a payload from a registered connection to every
    /// connection currently in the registry, including the sender.
    ///
    /// Delivery is at-most-once and best-effort: the membership is
    /// snapshotted when the message arrives, and a failed send to one
    /// recipient is logged without aborting delivery to the rest.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Protocol` if the sender is not registered;
    /// the message is dropped.
    pub async fn on_message(
        &self,
        connection_id: ConnectionId,
        payload: Payload,
    ) -> Result<usize, RelayError> {
        if !self.registry.contains(&connection_id).await {
            tracing::warn!(
                connection_id = %connection_id,
                "dropping message from unregistered connection"
            );
            return Err(RelayError::Protocol {
                connection_id: connection_id.into_string(),
            });
        }

        let frame = serde_json::to_string(&MessageFrame::broadcast(payload.into_string()))?;

        let members = self.registry.snapshot().await;
        let mut recipients = 0;
        for member in &members {
            match member.send(&frame) {
                Ok(()) => recipients += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping recipient during broadcast");
                }
            }
        }

        tracing::debug!(
            sender = %connection_id,
            recipients,
            members = members.len(),
            "broadcast complete"
        );
        Ok(recipients)
    }

    /// Remove a connection from the registry.
    ///
    /// Idempotent: disconnecting an identifier that is not registered is
    /// a no-op, not an error.
    pub async fn on_disconnect(&self, connection_id: ConnectionId) {
        match self.registry.remove(&connection_id).await {
            Some(_) => {
                tracing::info!(connection_id = %connection_id, "connection removed from registry");
            }
            None => {
                tracing::debug!(
                    connection_id = %connection_id,
                    "disconnect for unknown connection ignored"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockConnectionRegistry,
        infrastructure::repository::InMemoryConnectionRegistry,
    };
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn create_relay() -> (RelayService, Arc<InMemoryConnectionRegistry>) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        (RelayService::new(registry.clone()), registry)
    }

    async fn connect(relay: &RelayService) -> (ConnectionId, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = relay.on_connect(tx).await.unwrap();
        (connection_id, rx)
    }

    /// Drain every frame queued for one recipient and return the payloads.
    fn received_payloads(rx: &mut UnboundedReceiver<String>) -> Vec<String> {
        let mut payloads = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            let frame: MessageFrame = serde_json::from_str(&frame).unwrap();
            payloads.push(frame.payload);
        }
        payloads
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_including_sender() {
        // given: two registered connections
        let (relay, _registry) = create_relay();
        let (alice, mut alice_rx) = connect(&relay).await;
        let (_bob, mut bob_rx) = connect(&relay).await;

        // when: alice sends "hi"
        let recipients = relay
            .on_message(alice.clone(), Payload::new("hi".to_string()))
            .await
            .unwrap();

        // then: both alice and bob receive exactly one copy
        assert_eq!(recipients, 2);
        assert_eq!(received_payloads(&mut alice_rx), vec!["hi".to_string()]);
        assert_eq!(received_payloads(&mut bob_rx), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_disconnected_connection_excluded_from_broadcast() {
        // given: alice and bob connected, then bob disconnects
        let (relay, _registry) = create_relay();
        let (alice, mut alice_rx) = connect(&relay).await;
        let (bob, mut bob_rx) = connect(&relay).await;
        relay.on_disconnect(bob).await;

        // when: alice sends "hi"
        let recipients = relay
            .on_message(alice.clone(), Payload::new("hi".to_string()))
            .await
            .unwrap();

        // then: only alice receives
        assert_eq!(recipients, 1);
        assert_eq!(received_payloads(&mut alice_rx), vec!["hi".to_string()]);
        assert_eq!(received_payloads(&mut bob_rx), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_message_from_unregistered_connection_is_dropped() {
        // given: one registered connection and one unknown identifier
        let (relay, _registry) = create_relay();
        let (_alice, mut alice_rx) = connect(&relay).await;
        let unknown = ConnectionId::new("unknown".to_string()).unwrap();

        // when:
        let result = relay
            .on_message(unknown, Payload::new("hi".to_string()))
            .await;

        // then: ProtocolError, nobody receives, the relay keeps working
        assert!(matches!(
            result.unwrap_err(),
            RelayError::Protocol { connection_id } if connection_id == "unknown"
        ));
        assert_eq!(received_payloads(&mut alice_rx), Vec::<String>::new());

        let (bob, _bob_rx) = connect(&relay).await;
        let recipients = relay
            .on_message(bob, Payload::new("still alive".to_string()))
            .await
            .unwrap();
        assert_eq!(recipients, 2);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        // given: alice and bob connected, bob already disconnected
        let (relay, registry) = create_relay();
        let (_alice, _alice_rx) = connect(&relay).await;
        let (bob, _bob_rx) = connect(&relay).await;
        relay.on_disconnect(bob.clone()).await;
        assert_eq!(registry.count().await, 1);

        // when: bob is disconnected a second time
        relay.on_disconnect(bob).await;

        // then: no observable change
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_late_joiner_never_sees_earlier_messages() {
        // given: alice sends "x" and leaves before bob joins
        let (relay, _registry) = create_relay();
        let (alice, _alice_rx) = connect(&relay).await;
        relay
            .on_message(alice.clone(), Payload::new("x".to_string()))
            .await
            .unwrap();
        relay.on_disconnect(alice).await;

        let (bob, mut bob_rx) = connect(&relay).await;

        // when: bob sends "y"
        let recipients = relay
            .on_message(bob, Payload::new("y".to_string()))
            .await
            .unwrap();

        // then: bob receives only "y", never "x"
        assert_eq!(recipients, 1);
        assert_eq!(received_payloads(&mut bob_rx), vec!["y".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_send_does_not_abort_broadcast() {
        // given: bob's transport receiver is gone
        let (relay, registry) = create_relay();
        let (alice, mut alice_rx) = connect(&relay).await;
        let (_bob, bob_rx) = connect(&relay).await;
        drop(bob_rx);

        // when: alice sends "hi"
        let recipients = relay
            .on_message(alice.clone(), Payload::new("hi".to_string()))
            .await
            .unwrap();

        // then: delivery to alice still happened; bob stays registered
        // until the transport reports the disconnect
        assert_eq!(recipients, 1);
        assert_eq!(received_payloads(&mut alice_rx), vec!["hi".to_string()]);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_payload_is_carried_verbatim() {
        // given: a payload full of JSON metacharacters
        let (relay, _registry) = create_relay();
        let (alice, mut alice_rx) = connect(&relay).await;
        let raw = r#"{"nested": "quo\"tes", "n": 1}"#;

        // when:
        relay
            .on_message(alice, Payload::new(raw.to_string()))
            .await
            .unwrap();

        // then:
        assert_eq!(received_payloads(&mut alice_rx), vec![raw.to_string()]);
    }

    #[tokio::test]
    async fn test_handle_event_dispatches_connect() {
        // given:
        let (relay, registry) = create_relay();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when:
        let outcome = relay
            .handle_event(RelayEvent::Connect { transport: tx })
            .await
            .unwrap();

        // then:
        let RelayOutcome::Connected(connection_id) = outcome else {
            panic!("expected Connected outcome, got {outcome:?}");
        };
        assert!(registry.contains(&connection_id).await);
    }

    #[tokio::test]
    async fn test_handle_event_dispatches_message_and_disconnect() {
        // given:
        let (relay, registry) = create_relay();
        let (alice, mut alice_rx) = connect(&relay).await;

        // when: a message event, then a disconnect event
        let broadcast = relay
            .handle_event(RelayEvent::Message {
                connection_id: alice.clone(),
                payload: Payload::new("hi".to_string()),
            })
            .await
            .unwrap();
        let disconnected = relay
            .handle_event(RelayEvent::Disconnect {
                connection_id: alice.clone(),
            })
            .await
            .unwrap();

        // then:
        assert_eq!(broadcast, RelayOutcome::Broadcast { recipients: 1 });
        assert_eq!(received_payloads(&mut alice_rx), vec!["hi".to_string()]);
        assert_eq!(disconnected, RelayOutcome::Disconnected);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_unregistered_sender_never_triggers_snapshot() {
        // given: a registry that knows no connections
        let mut registry = MockConnectionRegistry::new();
        registry.expect_contains().returning(|_| false);
        registry.expect_snapshot().times(0);
        let relay = RelayService::new(Arc::new(registry));

        // when:
        let result = relay
            .on_message(
                ConnectionId::new("ghost".to_string()).unwrap(),
                Payload::new("hi".to_string()),
            )
            .await;

        // then: rejected before any membership read
        assert!(matches!(result.unwrap_err(), RelayError::Protocol { .. }));
    }
}
