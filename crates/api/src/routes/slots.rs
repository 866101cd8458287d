use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers, middleware::rate_limit::limit_reservations};

pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        .route("/slots", get(handlers::slots::list_slots))
        .route("/slots/upcoming", get(handlers::slots::upcoming_slots))
        .route("/slots/reset", post(handlers::slots::reset_slots))
        .route("/slots/:key", get(handlers::slots::slots_by_date))
        .route(
            "/slots/:key/reserve",
            post(handlers::slots::reserve_slot)
                .route_layer(from_fn_with_state(state, limit_reservations)),
        )
        .route("/slots/:key/cancel", post(handlers::slots::cancel_slot))
}
