use axum::http::StatusCode;
use chrono::{Duration, Months, NaiveDate, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotbook_core::models::{
    requests::{ErrorResponse, ResetResponse},
    slot::{Slot, SlotEvent, SlotKey, SlotStatus},
};

use crate::test_utils::{TestContext, at, available_slot, reserved_slot};

fn error_of(response: &axum_test::TestResponse) -> String {
    response.json::<ErrorResponse>().error
}

#[tokio::test]
async fn test_list_slots_defaults_to_available() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_by_status()
        .with(predicate::eq(SlotStatus::Available))
        .times(1)
        .returning(|_| Ok(vec![available_slot(1, 8), available_slot(2, 9)]));
    let (server, _) = ctx.build_server();

    let response = server.get("/slots").await;

    response.assert_status_ok();
    let slots: Vec<Slot> = response.json();
    assert_eq!(slots.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_list_slots_by_reserved_status() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_by_status()
        .with(predicate::eq(SlotStatus::Reserved))
        .times(1)
        .returning(|_| Ok(vec![reserved_slot(3, 10, "nurse-1")]));
    let (server, _) = ctx.build_server();

    let response = server.get("/slots").add_query_param("status", "reserved").await;

    response.assert_status_ok();
    let slots: Vec<Slot> = response.json();
    assert_eq!(slots[0].nurse_id.as_deref(), Some("nurse-1"));
}

#[tokio::test]
async fn test_list_slots_rejects_unknown_status() {
    let mut ctx = TestContext::new();
    ctx.store.expect_list_by_status().never();
    let (server, _) = ctx.build_server();

    let response = server.get("/slots").add_query_param("status", "pending").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&response),
        "Invalid status. Use 'available' or 'reserved'"
    );
}

#[tokio::test]
async fn test_slots_by_date_queries_that_day() {
    let today = Utc::now().date_naive();
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_by_date()
        .with(predicate::eq(today))
        .times(1)
        .returning(|_| Ok(vec![available_slot(1, 8)]));
    let (server, _) = ctx.build_server();

    let response = server
        .get(&format!("/slots/{}", today.format("%Y-%m-%d")))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Slot>>().len(), 1);
}

#[tokio::test]
async fn test_slots_by_date_rejects_malformed_date_without_querying() {
    let mut ctx = TestContext::new();
    ctx.store.expect_list_by_date().never();
    let (server, _) = ctx.build_server();

    for raw in ["2024-1-05", "tomorrow", "2024-02-30"] {
        let response = server.get(&format!("/slots/{}", raw)).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Invalid date format. Use YYYY-MM-DD");
    }
}

#[tokio::test]
async fn test_slots_by_date_rejects_dates_past_three_months() {
    let mut ctx = TestContext::new();
    ctx.store.expect_list_by_date().never();
    let (server, _) = ctx.build_server();

    let too_far: NaiveDate = Utc::now()
        .date_naive()
        .checked_add_months(Months::new(4))
        .unwrap();
    let response = server
        .get(&format!("/slots/{}", too_far.format("%Y-%m-%d")))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&response), "Date must be within the next 3 months");
}

#[tokio::test]
async fn test_upcoming_slots_spans_requested_days() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_upcoming()
        .withf(|from, until| *until - *from == Duration::days(3))
        .times(1)
        .returning(|_, _| Ok(vec![available_slot(1, 8)]));
    let (server, _) = ctx.build_server();

    let response = server.get("/slots/upcoming").add_query_param("days", "3").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_upcoming_slots_rejects_out_of_range_days() {
    let mut ctx = TestContext::new();
    ctx.store.expect_list_upcoming().never();
    let (server, _) = ctx.build_server();

    for days in ["0", "11", "soon"] {
        let response = server.get("/slots/upcoming").add_query_param("days", days).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Days parameter must be between 1 and 10");
    }
}

#[tokio::test]
async fn test_reserve_succeeds_once_then_reports_not_available() {
    let mut ctx = TestContext::new();
    let mut calls = 0;
    ctx.store
        .expect_reserve()
        .with(predicate::eq(SlotKey::Id(7)), predicate::eq("nurse-1".to_string()))
        .times(2)
        .returning(move |_, nurse_id| {
            calls += 1;
            if calls == 1 {
                Ok(Some(reserved_slot(7, 8, &nurse_id)))
            } else {
                Ok(None)
            }
        });
    let (server, _) = ctx.build_server();

    let first = server
        .post("/slots/7/reserve")
        .json(&json!({ "nurse_id": "nurse-1" }))
        .await;
    first.assert_status_ok();
    let slot: Slot = first.json();
    assert_eq!(slot.status, SlotStatus::Reserved);
    assert_eq!(slot.nurse_id.as_deref(), Some("nurse-1"));

    let second = server
        .post("/slots/7/reserve")
        .json(&json!({ "nurse_id": "nurse-1" }))
        .await;
    second.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&second), "Slot not available");
}

#[tokio::test]
async fn test_reserve_by_start_time_with_non_numeric_path() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_reserve()
        .with(
            predicate::eq(SlotKey::StartTime(at(9))),
            predicate::eq("nurse-2".to_string()),
        )
        .times(1)
        .returning(|_, nurse_id| Ok(Some(reserved_slot(2, 9, &nurse_id))));
    let (server, _) = ctx.build_server();

    let response = server
        .post("/slots/by-time/reserve")
        .json(&json!({ "nurse_id": "nurse-2", "start_time": at(9) }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Slot>().id, 2);
}

#[tokio::test]
async fn test_reserve_requires_nurse_id() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().never();
    let (server, _) = ctx.build_server();

    let empty_body = server.post("/slots/1/reserve").json(&json!({})).await;
    empty_body.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&empty_body), "nurse_id is required");

    let no_body = server.post("/slots/1/reserve").await;
    no_body.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&no_body), "nurse_id is required");
}

#[tokio::test]
async fn test_reserve_rejects_id_and_start_time_together() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().never();
    let (server, _) = ctx.build_server();

    let response = server
        .post("/slots/5/reserve")
        .json(&json!({ "nurse_id": "nurse-1", "start_time": at(9) }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&response),
        "Provide either slot ID or start_time, not both"
    );
}

#[tokio::test]
async fn test_reserve_reports_malformed_body() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().never();
    let (server, _) = ctx.build_server();

    let bad_time = server
        .post("/slots/1/reserve")
        .json(&json!({ "nurse_id": "nurse-1", "start_time": "not-a-time" }))
        .await;
    bad_time.assert_status(StatusCode::BAD_REQUEST);
    let message = error_of(&bad_time);
    assert_ne!(message, "nurse_id is required");
    assert!(message.contains("start_time"), "{message}");

    let plain_text = server
        .post("/slots/1/reserve")
        .text(r#"{"nurse_id":"nurse-1"}"#)
        .await;
    plain_text.assert_status(StatusCode::BAD_REQUEST);
    assert_ne!(error_of(&plain_text), "nurse_id is required");
}

#[tokio::test]
async fn test_reserve_rejects_overlong_nurse_id() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().never();
    let (server, _) = ctx.build_server();

    let response = server
        .post("/slots/1/reserve")
        .json(&json!({ "nurse_id": "n".repeat(256) }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&response),
        "nurse_id must be at most 255 characters"
    );
}

#[tokio::test]
async fn test_reserve_rejects_non_numeric_id_without_start_time() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().never();
    let (server, _) = ctx.build_server();

    let response = server
        .post("/slots/abc/reserve")
        .json(&json!({ "nurse_id": "nurse-1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&response), "Either slot ID or start_time is required");
}

#[tokio::test]
async fn test_reserve_publishes_slot_update() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_reserve()
        .returning(|_, nurse_id| Ok(Some(reserved_slot(4, 11, &nurse_id))));
    let (server, state) = ctx.build_server();
    let mut events = state.notifier.subscribe();

    server
        .post("/slots/4/reserve")
        .json(&json!({ "nurse_id": "nurse-3" }))
        .await
        .assert_status_ok();

    let event = events.try_recv().expect("reserve should publish an event");
    assert_eq!(event, SlotEvent::SlotUpdated(reserved_slot(4, 11, "nurse-3")));
}

#[tokio::test]
async fn test_failed_reserve_publishes_nothing() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reserve().returning(|_, _| Ok(None));
    let (server, state) = ctx.build_server();
    let mut events = state.notifier.subscribe();

    server
        .post("/slots/4/reserve")
        .json(&json!({ "nurse_id": "nurse-3" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_cancel_by_holder_frees_slot() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_cancel()
        .with(predicate::eq(SlotKey::Id(5)), predicate::eq("nurse-1".to_string()))
        .times(1)
        .returning(|_, _| Ok(Some(available_slot(5, 12))));
    let (server, state) = ctx.build_server();
    let mut events = state.notifier.subscribe();

    let response = server
        .post("/slots/5/cancel")
        .json(&json!({ "nurse_id": "nurse-1" }))
        .await;

    response.assert_status_ok();
    let slot: Slot = response.json();
    assert!(slot.is_available());
    assert_eq!(slot.nurse_id, None);
    assert_eq!(events.try_recv().unwrap().slot().id, 5);
}

#[tokio::test]
async fn test_cancel_by_other_nurse_is_invalid() {
    let mut ctx = TestContext::new();
    ctx.store.expect_cancel().times(1).returning(|_, _| Ok(None));
    let (server, _) = ctx.build_server();

    let response = server
        .post("/slots/5/cancel")
        .json(&json!({ "nurse_id": "nurse-2" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&response), "Invalid reservation");
}

#[tokio::test]
async fn test_reset_returns_and_publishes_updated_slots() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_reset_all()
        .times(1)
        .returning(|| Ok(vec![available_slot(1, 8), available_slot(2, 9)]));
    let (server, state) = ctx.build_server();
    let mut events = state.notifier.subscribe();

    let response = server.post("/slots/reset").await;

    response.assert_status_ok();
    let body: ResetResponse = response.json();
    assert_eq!(body.message, "All slots reset to available");
    assert_eq!(body.updated_slots.len(), 2);
    assert_eq!(events.try_recv().unwrap().slot().id, 1);
    assert_eq!(events.try_recv().unwrap().slot().id, 2);
}

#[tokio::test]
async fn test_reset_with_nothing_reserved_is_empty() {
    let mut ctx = TestContext::new();
    ctx.store.expect_reset_all().returning(|| Ok(Vec::new()));
    let (server, _) = ctx.build_server();

    let response = server.post("/slots/reset").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["updatedSlots"], json!([]));
}

#[tokio::test]
async fn test_store_failure_hides_details() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_by_status()
        .returning(|_| Err(eyre::eyre!("connection refused")));
    let (server, _) = ctx.build_server();

    let response = server.get("/slots").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&response), "Internal server error");
}
