//! WebSocket notification channel
//!
//! `GET /ws` upgrades to a push-only stream: every event published on the
//! notification bus is forwarded as a JSON text frame. Client text frames
//! are ignored; pings are answered.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use futures::{SinkExt, StreamExt};

use crate::core::ServerState;
use crate::services::NotificationBus;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(handle_ws))
}

/// GET /ws - upgrade to WebSocket
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let bus = state.notifications.clone();
    ws.on_upgrade(move |socket| handle_ws_connection(socket, bus))
}

async fn handle_ws_connection(socket: WebSocket, bus: NotificationBus) {
    let mut subscription = bus.subscribe();
    let connection_id = subscription.id;
    tracing::info!(
        connection_id,
        connections = bus.connection_count(),
        "WebSocket connected"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();

    loop {
        tokio::select! {
            // Event from the bus
            event = subscription.receiver.recv() => {
                let Some(event) = event else {
                    // Pruned by the bus
                    break;
                };
                let json = match serde_json::to_string(event.as_ref()) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(connection_id, kind = event.kind(), "Failed to serialize notification: {e}");
                        continue;
                    }
                };
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    tracing::debug!(connection_id, "WebSocket send failed, disconnecting");
                    break;
                }
            }

            // Incoming frame from the client
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(connection_id, "WebSocket disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(connection_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {} // Text, Binary, Pong: ignore
                }
            }
        }
    }

    bus.unsubscribe(connection_id);
}
