use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use slotbook_core::{
    models::slot::{Slot, SlotKey, SlotStatus},
    windows::SlotWindow,
};

use crate::{
    DbPool,
    models::into_slots,
    repositories::slot as queries,
};

/// Access to the slot table.
///
/// Each method is one round trip to the database. `reserve` and `cancel` return
/// `Ok(None)` when the conditional update matched no row.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn list_by_status(&self, status: SlotStatus) -> Result<Vec<Slot>>;

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Slot>>;

    /// Available slots with `from <= start_time < until`.
    async fn list_upcoming(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Slot>>;

    async fn reserve(&self, key: SlotKey, nurse_id: String) -> Result<Option<Slot>>;

    async fn cancel(&self, key: SlotKey, nurse_id: String) -> Result<Option<Slot>>;

    async fn reset_all(&self) -> Result<Vec<Slot>>;

    async fn seed(&self, windows: Vec<SlotWindow>) -> Result<u64>;
}

/// PostgreSQL-backed [`SlotStore`].
#[derive(Clone)]
pub struct PgSlotStore {
    pool: DbPool,
}

impl PgSlotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn list_by_status(&self, status: SlotStatus) -> Result<Vec<Slot>> {
        into_slots(queries::get_slots_by_status(&self.pool, status).await?)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Slot>> {
        into_slots(queries::get_slots_by_date(&self.pool, date).await?)
    }

    async fn list_upcoming(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Slot>> {
        into_slots(queries::get_available_slots_between(&self.pool, from, until).await?)
    }

    async fn reserve(&self, key: SlotKey, nurse_id: String) -> Result<Option<Slot>> {
        queries::reserve_slot(&self.pool, key, &nurse_id)
            .await?
            .map(Slot::try_from)
            .transpose()
    }

    async fn cancel(&self, key: SlotKey, nurse_id: String) -> Result<Option<Slot>> {
        queries::cancel_slot(&self.pool, key, &nurse_id)
            .await?
            .map(Slot::try_from)
            .transpose()
    }

    async fn reset_all(&self) -> Result<Vec<Slot>> {
        into_slots(queries::reset_all_slots(&self.pool).await?)
    }

    async fn seed(&self, windows: Vec<SlotWindow>) -> Result<u64> {
        queries::insert_windows(&self.pool, &windows).await
    }
}
