//! Push channel subscription.

use std::pin::Pin;

use eyre::{Result, WrapErr, eyre};
use futures::{Stream, StreamExt, future};
use slotbook_core::models::slot::SlotEvent;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

pub type EventStream = Pin<Box<dyn Stream<Item = SlotEvent> + Send>>;

/// WebSocket URL of the push channel for an API base URL.
pub fn push_url(api_url: &str) -> Result<String> {
    let api_url = api_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(eyre!("API_URL must start with http:// or https://: {}", api_url));
    };
    Ok(format!("{}/ws", ws_base))
}

/// Decodes one push frame. Non-text frames and unknown payloads yield `None`.
pub fn decode_event(message: &Message) -> Option<SlotEvent> {
    let Message::Text(payload) = message else {
        return None;
    };
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Ignoring malformed push event: {}", e);
            None
        }
    }
}

/// Connects to the push channel and yields slot events until it closes.
///
/// Delivery is best-effort. Callers that need the full picture re-fetch.
pub async fn subscribe(api_url: &str) -> Result<EventStream> {
    let url = push_url(api_url)?;
    let (socket, _) = connect_async(url.as_str())
        .await
        .wrap_err_with(|| format!("Failed to connect to {}", url))?;
    info!("Subscribed to {}", url);

    let events = socket
        .take_while(|message| future::ready(message.is_ok()))
        .filter_map(|message| future::ready(message.ok().as_ref().and_then(decode_event)));

    Ok(Box::pin(events))
}
