use std::{sync::Arc, time::Duration};

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use slotbook_api::{
    ApiState, build_router, middleware::rate_limit::RateLimiter, notifier::Notifier,
};
use slotbook_core::models::slot::{Slot, SlotStatus};
use slotbook_db::mock::repositories::MockSlotStore;

pub struct TestContext {
    // Expectations are set on the mock before the server is built
    pub store: MockSlotStore,
    pub reserve_limit: u32,
    pub trust_proxy: bool,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: MockSlotStore::new(),
            // High enough that handler tests never trip the limiter
            reserve_limit: 100,
            trust_proxy: false,
        }
    }

    pub fn with_reserve_limit(mut self, limit: u32) -> Self {
        self.reserve_limit = limit;
        self
    }

    pub fn with_trusted_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }

    // Build state around the mock store
    pub fn build_state(self) -> Arc<ApiState> {
        Arc::new(ApiState::new(
            Arc::new(self.store),
            Notifier::new(16),
            RateLimiter::new(self.reserve_limit, Duration::from_secs(60))
                .trust_forwarded_for(self.trust_proxy),
        ))
    }

    pub fn build_server(self) -> (TestServer, Arc<ApiState>) {
        let state = self.build_state();
        let server = TestServer::new(build_router(state.clone()))
            .expect("test server should start");
        (server, state)
    }
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 15, hour, 0, 0).unwrap()
}

pub fn available_slot(id: i32, hour: u32) -> Slot {
    Slot {
        id,
        start_time: at(hour),
        end_time: at(hour + 1),
        status: SlotStatus::Available,
        nurse_id: None,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn reserved_slot(id: i32, hour: u32, nurse_id: &str) -> Slot {
    Slot {
        status: SlotStatus::Reserved,
        nurse_id: Some(nurse_id.to_string()),
        ..available_slot(id, hour)
    }
}
