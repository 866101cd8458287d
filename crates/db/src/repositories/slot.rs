//! Slot queries and the reservation resolver.
//!
//! Every mutation here is a single conditional `UPDATE ... RETURNING` statement.
//! Under concurrent requests for the same slot PostgreSQL lets exactly one
//! statement match the row; the others see the new status and match nothing.
//! Callers must not add a read before the update: that reintroduces the race.

use crate::models::DbSlot;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use slotbook_core::{
    models::slot::{SlotKey, SlotStatus},
    windows::SlotWindow,
};
use sqlx::{Pool, Postgres};

pub async fn get_slots_by_status(
    pool: &Pool<Postgres>,
    status: SlotStatus,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_time, end_time, status, nurse_id, created_at, updated_at
        FROM slots
        WHERE status = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_slots_by_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_time, end_time, status, nurse_id, created_at, updated_at
        FROM slots
        WHERE date_trunc('day', start_time AT TIME ZONE 'UTC') = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_available_slots_between(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_time, end_time, status, nurse_id, created_at, updated_at
        FROM slots
        WHERE status = 'available'
          AND start_time >= $1
          AND start_time < $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Attempts `available -> reserved` for the addressed slot.
///
/// Returns `None` when the slot does not exist or is already reserved.
pub async fn reserve_slot(
    pool: &Pool<Postgres>,
    key: SlotKey,
    nurse_id: &str,
) -> Result<Option<DbSlot>> {
    tracing::debug!("Reserving slot {} for nurse_id={}", key, nurse_id);

    let query = match key {
        SlotKey::Id(id) => sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET status = 'reserved', nurse_id = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            RETURNING id, start_time, end_time, status, nurse_id, created_at, updated_at
            "#,
        )
        .bind(id),
        SlotKey::StartTime(start_time) => sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET status = 'reserved', nurse_id = $2, updated_at = NOW()
            WHERE start_time = $1 AND status = 'available'
            RETURNING id, start_time, end_time, status, nurse_id, created_at, updated_at
            "#,
        )
        .bind(start_time),
    };

    let slot = query.bind(nurse_id).fetch_optional(pool).await?;

    if slot.is_none() {
        tracing::debug!("Slot {} not available", key);
    }

    Ok(slot)
}

/// Attempts `reserved -> available` for a slot held by `nurse_id`.
///
/// Returns `None` when the slot does not exist, is not reserved, or is held by
/// someone else.
pub async fn cancel_slot(
    pool: &Pool<Postgres>,
    key: SlotKey,
    nurse_id: &str,
) -> Result<Option<DbSlot>> {
    tracing::debug!("Cancelling slot {} for nurse_id={}", key, nurse_id);

    let query = match key {
        SlotKey::Id(id) => sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET status = 'available', nurse_id = NULL, updated_at = NOW()
            WHERE id = $1 AND status = 'reserved' AND nurse_id = $2
            RETURNING id, start_time, end_time, status, nurse_id, created_at, updated_at
            "#,
        )
        .bind(id),
        SlotKey::StartTime(start_time) => sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET status = 'available', nurse_id = NULL, updated_at = NOW()
            WHERE start_time = $1 AND status = 'reserved' AND nurse_id = $2
            RETURNING id, start_time, end_time, status, nurse_id, created_at, updated_at
            "#,
        )
        .bind(start_time),
    };

    let slot = query.bind(nurse_id).fetch_optional(pool).await?;

    Ok(slot)
}

/// Flips every reserved slot back to available and returns the changed rows.
pub async fn reset_all_slots(pool: &Pool<Postgres>) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET status = 'available', nurse_id = NULL, updated_at = NOW()
        WHERE status = 'reserved'
        RETURNING id, start_time, end_time, status, nurse_id, created_at, updated_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Reset {} reserved slots", slots.len());
    Ok(slots)
}

/// Bulk-inserts windows as available slots, skipping start times that already exist.
pub async fn insert_windows(pool: &Pool<Postgres>, windows: &[SlotWindow]) -> Result<u64> {
    if windows.is_empty() {
        return Ok(0);
    }

    let (starts, ends): (Vec<DateTime<Utc>>, Vec<DateTime<Utc>>) = windows
        .iter()
        .map(|w| (w.start_time, w.end_time))
        .unzip();

    let result = sqlx::query(
        r#"
        INSERT INTO slots (start_time, end_time)
        SELECT * FROM UNNEST($1::timestamptz[], $2::timestamptz[])
        ON CONFLICT (start_time) DO NOTHING
        "#,
    )
    .bind(starts)
    .bind(ends)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
