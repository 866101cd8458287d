use chrono::{DateTime, Utc};
use eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use slotbook_core::models::slot::{Slot, SlotStatus};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub nurse_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbSlot> for Slot {
    type Error = Report;

    fn try_from(row: DbSlot) -> Result<Self> {
        let status = row
            .status
            .parse::<SlotStatus>()
            .map_err(|_| eyre::eyre!("Unexpected status {:?} on slot {}", row.status, row.id))?;

        Ok(Slot {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
            nurse_id: row.nurse_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn into_slots(rows: Vec<DbSlot>) -> Result<Vec<Slot>> {
    rows.into_iter().map(Slot::try_from).collect()
}
