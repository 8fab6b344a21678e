//! WebSocket handler for the robot state stream.
//!
//! Each accepted connection is registered with the broadcaster immediately
//! and unregistered on disconnect or send failure. The endpoint itself does
//! no periodic work; frames arrive from the broadcast loop.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(mut socket: WebSocket, state: AppState) {
    let id = Uuid::new_v4();
    let mut rx = state.broadcaster.register(id).await;
    tracing::info!(
        "Client connected: {} (total: {})",
        id,
        state.broadcaster.subscriber_count().await
    );

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Some(text) => {
                        if socket.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    // Channel closed: superseded registration or shutdown.
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // The stream is push-only; inbound frames are ignored.
                    Some(Ok(_)) => {}
                    // Close frame, protocol error, or connection gone.
                    _ => break,
                }
            }
        }
    }

    state.broadcaster.unregister(id).await;
    tracing::warn!(
        "Client disconnected: {} (remaining: {})",
        id,
        state.broadcaster.subscriber_count().await
    );
}
