//! The live metrics channel.
//!
//! # Responsibilities
//! - Upgrade `GET /live` to a WebSocket
//! - Register one broadcaster subscription per connection
//! - Forward events as JSON text frames, in publish order
//! - Unsubscribe on close, error, or server-side drop
//!
//! Clients send no commands; inbound frames other than Close are ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};

use crate::http::server::AppState;

/// `GET /live` — upgrade and hand the socket to the pump.
pub async fn live_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| pump(socket, state))
}

async fn pump(mut socket: WebSocket, state: AppState) {
    let mut subscriber = state.broadcaster.subscribe();
    let id = subscriber.id();
    tracing::debug!(subscriber = %id, "Live client connected");

    loop {
        tokio::select! {
            event = subscriber.recv() => {
                let Some(event) = event else {
                    // Unsubscribed server-side (e.g. queue overflow).
                    break;
                };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode live event");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // clients have nothing to say
                    Some(Err(_)) => break,
                }
            }
        }
    }

    state.broadcaster.unsubscribe(&id);
    tracing::debug!(subscriber = %id, "Live client disconnected");
}
