use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use slotbook_core::models::slot::SlotEvent;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{error, info, warn};

use crate::ApiState;

/// Upgrades to the push channel.
///
/// Each text frame is one JSON-encoded [`SlotEvent`], e.g.
/// `{"event":"slotUpdated","data":{...}}`. Messages sent by the client are ignored.
pub async fn push_channel(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ApiState>>,
) -> Response {
    // Subscribe before the handshake completes so nothing committed after this point is missed.
    let events = state.notifier.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, events))
}

async fn stream_events(mut socket: WebSocket, mut events: Receiver<SlotEvent>) {
    info!("Push client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            error!("Failed to encode slot event: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Push client fell behind; skipping missed events");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Push client disconnected");
}
