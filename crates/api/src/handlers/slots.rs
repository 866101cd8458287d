//! # Slot Handlers
//!
//! Thin translations from HTTP requests to [`SlotStore`](slotbook_db::SlotStore)
//! calls. Input shape is validated before the store is touched; every successful
//! mutation is published to the notifier before the response is returned.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Duration, Utc};
use slotbook_core::{
    errors::BookingError,
    models::{
        requests::{ListSlotsQuery, ResetResponse, UpcomingSlotsQuery},
        slot::{Slot, SlotKey},
    },
    validation::{parse_slot_date, parse_status_filter, parse_upcoming_days, require_nurse_id},
};
use tracing::info;

use crate::{ApiState, extractors::ActionPayload, middleware::error_handling::AppError};

/// Lists slots with the given status, ordered by start time.
///
/// # Endpoint
///
/// ```text
/// GET /slots?status=available|reserved
/// ```
///
/// `status` defaults to `available`.
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let status = parse_status_filter(query.status.as_deref())?;

    let slots = state
        .store
        .list_by_status(status)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(slots))
}

/// Lists every slot starting on a UTC calendar day.
///
/// # Endpoint
///
/// ```text
/// GET /slots/:date        (date = YYYY-MM-DD)
/// ```
///
/// # Errors
///
/// * `400 Invalid date format. Use YYYY-MM-DD` - the store is not queried
/// * `400 Date must be within the next 3 months`
#[axum::debug_handler]
pub async fn slots_by_date(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let date = parse_slot_date(&date, Utc::now().date_naive())?;

    let slots = state
        .store
        .list_by_date(date)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(slots))
}

/// Lists available slots from now through the next `days` days.
///
/// # Endpoint
///
/// ```text
/// GET /slots/upcoming?days=1..10
/// ```
#[axum::debug_handler]
pub async fn upcoming_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<UpcomingSlotsQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let days = parse_upcoming_days(query.days.as_deref())?;

    let from = Utc::now();
    let until = from + Duration::days(i64::from(days));
    let slots = state
        .store
        .list_upcoming(from, until)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(slots))
}

/// Reserves an available slot for the requesting nurse.
///
/// # Endpoint
///
/// ```text
/// POST /slots/:id/reserve
/// {"nurse_id": "nurse-1", "start_time": "2024-01-01T08:00:00Z"}
/// ```
///
/// `start_time` is an alternate identifier, accepted only when the path segment
/// is not an id. Exactly one of any number of concurrent requests for the same slot
/// succeeds, the others get `400 Slot not available`.
#[axum::debug_handler]
pub async fn reserve_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    ActionPayload(request): ActionPayload,
) -> Result<Json<Slot>, AppError> {
    let key = SlotKey::resolve(&id, request.start_time)?;
    let nurse_id = require_nurse_id(request.nurse_id.as_deref())?;

    let slot = state
        .store
        .reserve(key, nurse_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(BookingError::slot_not_available)?;

    info!(slot_id = slot.id, nurse_id = ?slot.nurse_id, "Slot reserved");
    state.notifier.publish(slot.clone());

    Ok(Json(slot))
}

/// Cancels a reservation held by the requesting nurse.
///
/// # Endpoint
///
/// ```text
/// POST /slots/:id/cancel
/// {"nurse_id": "nurse-1"}
/// ```
///
/// Fails with `400 Invalid reservation` unless the slot is reserved by `nurse_id`.
#[axum::debug_handler]
pub async fn cancel_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    ActionPayload(request): ActionPayload,
) -> Result<Json<Slot>, AppError> {
    let key = SlotKey::resolve(&id, request.start_time)?;
    let nurse_id = require_nurse_id(request.nurse_id.as_deref())?;

    let slot = state
        .store
        .cancel(key, nurse_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(BookingError::invalid_reservation)?;

    info!(slot_id = slot.id, "Reservation cancelled");
    state.notifier.publish(slot.clone());

    Ok(Json(slot))
}

/// Reverts every reserved slot to available.
///
/// # Endpoint
///
/// ```text
/// POST /slots/reset
/// ```
#[axum::debug_handler]
pub async fn reset_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ResetResponse>, AppError> {
    let updated_slots = state
        .store
        .reset_all()
        .await
        .map_err(BookingError::Database)?;

    info!(count = updated_slots.len(), "All slots reset to available");
    state.notifier.publish_all(updated_slots.iter().cloned());

    Ok(Json(ResetResponse {
        message: "All slots reset to available".to_string(),
        updated_slots,
    }))
}
