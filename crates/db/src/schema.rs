use chrono::Utc;
use eyre::Result;
use slotbook_core::windows::generate_daily_windows;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::repositories::slot::insert_windows;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id SERIAL PRIMARY KEY,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'available',
            nurse_id VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT slots_start_time_key UNIQUE (start_time),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_status CHECK (status IN ('available', 'reserved')),
            CONSTRAINT holder_matches_status CHECK (
                (status = 'available' AND nurse_id IS NULL)
                OR (status = 'reserved' AND nurse_id IS NOT NULL)
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_slots_day ON slots (date_trunc('day', start_time AT TIME ZONE 'UTC'))",
        "CREATE INDEX IF NOT EXISTS idx_slots_status ON slots (status)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Inserts hourly windows for the next `horizon_days` days starting today (UTC).
///
/// Existing start times are left untouched, so this is safe to run on every start.
pub async fn seed_slots(
    pool: &Pool<Postgres>,
    horizon_days: u32,
    open_hour: u32,
    close_hour: u32,
) -> Result<u64> {
    let today = Utc::now().date_naive();
    let windows = generate_daily_windows(today, horizon_days, open_hour, close_hour);
    let generated = windows.len();

    let inserted = insert_windows(pool, &windows).await?;
    info!(generated, inserted, horizon_days, "Seeded time slots");

    Ok(inserted)
}
