//! # SlotBook API
//!
//! The API crate provides the web server for the SlotBook appointment service.
//! It exposes slot listing and booking endpoints plus a WebSocket push channel
//! that announces every committed slot change.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate input, call the slot store, publish changes
//! - **Middleware**: Error mapping and the reservation rate limit
//! - **Notifier**: Broadcast fan-out to push subscribers
//! - **Config**: Environment-driven settings
//!
//! All conflict resolution happens inside the store's single-statement
//! updates; the API itself holds no locks around a reservation.

/// Configuration module for API settings
pub mod config;
/// Body extractors shared by the slot handlers
pub mod extractors;
/// Request handlers for slots and the push channel
pub mod handlers;
/// Middleware for error mapping and rate limiting
pub mod middleware;
/// Broadcast of committed slot changes
pub mod notifier;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use slotbook_db::SlotStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::{config::ApiConfig, middleware::rate_limit::RateLimiter, notifier::Notifier};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slotbook_api::{ApiState, build_router, config::ApiConfig};
/// use slotbook_db::{PgSlotStore, create_pool};
///
/// # async fn example() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let pool = create_pool(&config.database_url, config.db_max_connections).await?;
/// let state = Arc::new(ApiState::from_config(Arc::new(PgSlotStore::new(pool)), &config));
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
pub struct ApiState {
    /// Slot persistence and the reservation resolver
    pub store: Arc<dyn SlotStore>,
    /// Fan-out of committed slot changes
    pub notifier: Notifier,
    /// Per-caller guard for the reserve endpoint
    pub reserve_limiter: RateLimiter,
}

impl ApiState {
    pub fn new(store: Arc<dyn SlotStore>, notifier: Notifier, reserve_limiter: RateLimiter) -> Self {
        Self {
            store,
            notifier,
            reserve_limiter,
        }
    }

    pub fn from_config(store: Arc<dyn SlotStore>, config: &ApiConfig) -> Self {
        Self::new(
            store,
            Notifier::new(config.push_channel_capacity),
            RateLimiter::new(config.reserve_rate_limit, config.reserve_rate_window())
                .trust_forwarded_for(config.trust_proxy),
        )
    }
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::slots::routes(state.clone()))
        .merge(routes::push::routes())
        .with_state(state)
}

/// Installs the global tracing subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server and runs until Ctrl+C.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and limits
/// * `store` - Slot store backing every endpoint
pub async fn start_server(config: ApiConfig, store: Arc<dyn SlotStore>) -> Result<()> {
    let state = Arc::new(ApiState::from_config(store, &config));

    let ui_origin: HeaderValue = config
        .ui_url
        .parse()
        .wrap_err_with(|| format!("UI_URL is not a valid origin: {}", config.ui_url))?;
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(ui_origin);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(cors),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
