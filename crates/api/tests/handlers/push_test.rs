use std::time::Duration;

use futures::StreamExt;
use slotbook_api::build_router;
use slotbook_core::models::slot::SlotEvent;
use tokio::{net::TcpListener, time::timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::test_utils::{TestContext, reserved_slot};

#[tokio::test]
async fn test_push_channel_forwards_slot_updates() {
    let state = TestContext::new().build_state();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let (mut socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    // The handler subscribes before answering the handshake.
    assert_eq!(state.notifier.subscriber_count(), 1);

    let slot = reserved_slot(9, 14, "nurse-4");
    state.notifier.publish(slot.clone());

    let frame = timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("push frame should arrive")
        .expect("socket should stay open")
        .unwrap();
    let Message::Text(payload) = frame else {
        panic!("expected a text frame, got {:?}", frame);
    };

    let raw: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(raw["event"], "slotUpdated");
    let event: SlotEvent = serde_json::from_str(&payload).unwrap();
    assert_eq!(event.slot(), &slot);
}

#[tokio::test]
async fn test_publish_without_subscribers_is_harmless() {
    let state = TestContext::new().build_state();

    assert_eq!(state.notifier.publish(reserved_slot(1, 8, "nurse-1")), 0);
}
