//! WebSocket connection handlers.
//!
//! This is the transport boundary: it turns socket activity into the
//! three relay events (connect, message, disconnect) and drains the
//! relay's outbound channel back onto the socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::Payload,
    infrastructure::dto::websocket::{ConnectedFrame, EventType, UserMessageFrame},
    relay::{RelayEvent, RelayOutcome},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Channel the relay uses to push broadcast frames to this client
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Register through the relay's event dispatch; a failure here closes
    // this socket only
    let connection_id = match state
        .relay
        .handle_event(RelayEvent::Connect { transport: tx })
        .await
    {
        Ok(RelayOutcome::Connected(connection_id)) => connection_id,
        Ok(outcome) => {
            tracing::error!(?outcome, "connect event produced unexpected outcome");
            return;
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejecting connection attempt");
            return;
        }
    };

    // Acknowledge the handshake with the server-assigned identifier
    let connected = ConnectedFrame::new(connection_id.as_str().to_string());
    let connected_json = serde_json::to_string(&connected).unwrap();
    if let Err(e) = sender.send(Message::Text(connected_json.into())).await {
        tracing::error!("Failed to send connected ack to '{}': {}", connection_id, e);
        state
            .relay
            .on_disconnect(connection_id)
            .await;
        return;
    }
    tracing::info!("Sent connected ack to '{}'", connection_id);

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let Some(payload) = extract_payload(&text) else {
                        continue;
                    };

                    let event = RelayEvent::Message {
                        connection_id: recv_connection_id.clone(),
                        payload,
                    };
                    if let Err(err) = recv_state.relay.handle_event(event).await {
                        tracing::warn!(error = %err, "message event rejected");
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward broadcast frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // The transport reported closure; unregister. Idempotent, so a race
    // with another removal path is harmless.
    if let Err(err) = state
        .relay
        .handle_event(RelayEvent::Disconnect {
            connection_id: connection_id.clone(),
        })
        .await
    {
        tracing::warn!(error = %err, "disconnect event rejected");
    }
    tracing::info!("Client '{}' disconnected", connection_id);
}

/// Pull the opaque payload out of an inbound text frame.
///
/// Well-formed `user-message` frames carry the payload field; any other
/// recognized frame type is ignored. Text that does not parse as a frame
/// at all is treated as a bare payload (the relay enforces no schema).
fn extract_payload(text: &str) -> Option<Payload> {
    match serde_json::from_str::<UserMessageFrame>(text) {
        Ok(frame) if frame.r#type == EventType::UserMessage => Some(Payload::new(frame.payload)),
        Ok(frame) => {
            tracing::debug!(frame_type = ?frame.r#type, "ignoring non user-message frame");
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse message as JSON: {}", e);
            Some(Payload::new(text.to_string()))
        }
    }
}
