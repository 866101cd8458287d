//! # Rate Limiting Module
//!
//! Fixed-window, per-caller limiter guarding the reservation endpoint.
//!
//! Callers are identified by the peer socket address. The first address in
//! `X-Forwarded-For` is used instead only when the limiter is configured to
//! trust a fronting proxy; otherwise the header is ignored. Rejected requests
//! never reach the store.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use slotbook_core::errors::BookingError;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

// Sweep expired windows once this many callers are tracked.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    started: Instant,
    count: u32,
}

/// Allows at most `max_requests` per caller in each `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_forwarded: bool,
    windows: Mutex<HashMap<String, FixedWindow>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            trust_forwarded: false,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Keys callers by `X-Forwarded-For` when `trust` is set.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    pub fn trusts_forwarded_for(&self) -> bool {
        self.trust_forwarded
    }

    /// Records an attempt by `caller` and returns whether it is allowed.
    pub fn check(&self, caller: &str) -> bool {
        self.check_at(caller, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, caller: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows
            .entry(caller.to_string())
            .or_insert(FixedWindow { started: now, count: 0 });

        if now.duration_since(entry.started) >= self.window {
            *entry = FixedWindow { started: now, count: 0 };
        }

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }

    pub fn tracked_callers(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Middleware applied to the reserve route.
pub async fn limit_reservations(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = caller_key(&request, state.reserve_limiter.trusts_forwarded_for());

    if !state.reserve_limiter.check(&caller) {
        warn!(caller = %caller, path = %request.uri().path(), "Reservation rate limit exceeded");
        return Err(AppError(BookingError::RateLimited));
    }

    Ok(next.run(request).await)
}

/// Identifies the caller of a request for rate-limiting purposes.
///
/// `X-Forwarded-For` is only consulted when `trust_forwarded` is set.
pub fn caller_key(request: &Request, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(address) = forwarded {
            return address.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
