use axum::http::{HeaderName, HeaderValue, StatusCode};
use rstest::rstest;
use serde_json::json;
use slotbook_api::middleware::error_handling::map_error;
use slotbook_core::{errors::BookingError, models::requests::ErrorResponse};
use test_log::test;

use crate::test_utils::{TestContext, reserved_slot};

fn forwarded_for() -> HeaderName {
    HeaderName::from_static("x-forwarded-for")
}

#[rstest]
#[case::validation(BookingError::validation("nurse_id is required"), StatusCode::BAD_REQUEST, "nurse_id is required")]
#[case::conflict(BookingError::slot_not_available(), StatusCode::BAD_REQUEST, "Slot not available")]
#[case::rate_limited(BookingError::RateLimited, StatusCode::TOO_MANY_REQUESTS, "Too many requests")]
#[case::database(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
#[tokio::test]
async fn test_error_mapping(
    #[case] error: BookingError,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let response = map_error(error);

    assert_eq!(response.status(), status);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.error, message);
}

#[test(tokio::test)]
async fn test_reserve_rate_limit_blocks_before_store() {
    let mut ctx = TestContext::new().with_reserve_limit(2);
    ctx.store
        .expect_reserve()
        .times(2)
        .returning(|_, _| Ok(None));
    let (server, _) = ctx.build_server();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = server
            .post("/slots/1/reserve")
            .add_header(forwarded_for(), HeaderValue::from_static("203.0.113.7"))
            .json(&json!({ "nurse_id": "nurse-1" }))
            .await;
        statuses.push(response.status_code());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::BAD_REQUEST,
            StatusCode::BAD_REQUEST,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[test(tokio::test)]
async fn test_three_quick_reserves_with_single_allowance() {
    let mut ctx = TestContext::new().with_reserve_limit(1);
    ctx.store
        .expect_reserve()
        .times(1)
        .returning(|_, nurse_id| Ok(Some(reserved_slot(1, 8, &nurse_id))));
    let (server, _) = ctx.build_server();

    server
        .post("/slots/1/reserve")
        .json(&json!({ "nurse_id": "nurse-1" }))
        .await
        .assert_status_ok();

    for _ in 0..2 {
        let limited = server
            .post("/slots/1/reserve")
            .json(&json!({ "nurse_id": "nurse-1" }))
            .await;

        limited.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.json::<ErrorResponse>().error, "Too many requests");
    }
}

#[test(tokio::test)]
async fn test_rotating_forwarded_for_does_not_reset_allowance() {
    let mut ctx = TestContext::new().with_reserve_limit(2);
    ctx.store
        .expect_reserve()
        .times(2)
        .returning(|_, _| Ok(None));
    let (server, _) = ctx.build_server();

    let mut statuses = Vec::new();
    for i in 0..10 {
        let address = format!("10.9.9.{i}");
        let response = server
            .post("/slots/1/reserve")
            .add_header(forwarded_for(), HeaderValue::from_str(&address).unwrap())
            .json(&json!({ "nurse_id": "nurse-1" }))
            .await;
        statuses.push(response.status_code());
    }

    let mut expected = vec![StatusCode::BAD_REQUEST; 2];
    expected.extend([StatusCode::TOO_MANY_REQUESTS; 8]);
    assert_eq!(statuses, expected);
}

#[test(tokio::test)]
async fn test_rate_limit_is_per_caller_behind_trusted_proxy() {
    let mut ctx = TestContext::new()
        .with_reserve_limit(1)
        .with_trusted_proxy();
    ctx.store
        .expect_reserve()
        .times(2)
        .returning(|_, _| Ok(None));
    let (server, _) = ctx.build_server();

    for caller in ["198.51.100.1", "198.51.100.2, 10.0.0.1"] {
        server
            .post("/slots/1/reserve")
            .add_header(forwarded_for(), HeaderValue::from_str(caller).unwrap())
            .json(&json!({ "nurse_id": "nurse-1" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[test(tokio::test)]
async fn test_rate_limit_only_guards_reserve() {
    let mut ctx = TestContext::new().with_reserve_limit(1);
    ctx.store
        .expect_cancel()
        .times(3)
        .returning(|_, _| Ok(None));
    let (server, _) = ctx.build_server();

    for _ in 0..3 {
        server
            .post("/slots/1/cancel")
            .json(&json!({ "nurse_id": "nurse-1" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
