use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use slotbook_core::{
    models::slot::{Slot, SlotKey, SlotStatus},
    windows::SlotWindow,
};

use crate::store::SlotStore;

// Mock store for handler tests
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn list_by_status(&self, status: SlotStatus) -> eyre::Result<Vec<Slot>>;

        async fn list_by_date(&self, date: NaiveDate) -> eyre::Result<Vec<Slot>>;

        async fn list_upcoming(
            &self,
            from: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> eyre::Result<Vec<Slot>>;

        async fn reserve(&self, key: SlotKey, nurse_id: String) -> eyre::Result<Option<Slot>>;

        async fn cancel(&self, key: SlotKey, nurse_id: String) -> eyre::Result<Option<Slot>>;

        async fn reset_all(&self) -> eyre::Result<Vec<Slot>>;

        async fn seed(&self, windows: Vec<SlotWindow>) -> eyre::Result<u64>;
    }
}
