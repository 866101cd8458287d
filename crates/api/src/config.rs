//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the SlotBook API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `UI_URL`: Origin allowed by CORS for the API and push channel (default: "http://localhost:5173")
//! - `PORT`: The port to listen on (default: 3000)
//! - `HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `RESERVE_RATE_LIMIT`: Reservation attempts allowed per caller per window (default: 2)
//! - `RESERVE_RATE_WINDOW_SECONDS`: Length of the rate-limit window (default: 60)
//! - `TRUST_PROXY`: Key the rate limit on `X-Forwarded-For` instead of the peer address (default: false)
//! - `SLOT_HORIZON_DAYS`: Days of slots created at bootstrap (default: 30)
//! - `SLOT_OPEN_HOUR` / `SLOT_CLOSE_HOUR`: Daily window of bootstrap slots, UTC (default: 8 / 20)
//! - `DB_MAX_CONNECTIONS`: Connection pool size (default: 5)
//! - `PUSH_CHANNEL_CAPACITY`: Events buffered per push subscriber (default: 256)

use std::{env, fmt::Display, str::FromStr, time::Duration};

use eyre::{Result, WrapErr, eyre};
use tracing::Level;

/// Configuration for the SlotBook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// Origin of the calendar front-end, allowed by CORS
    pub ui_url: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Reservation attempts allowed per caller per window
    pub reserve_rate_limit: u32,

    /// Rate-limit window in seconds
    pub reserve_rate_window: u64,

    /// Whether `X-Forwarded-For` identifies the caller (only behind a trusted proxy)
    pub trust_proxy: bool,

    /// Days of slots generated at bootstrap
    pub slot_horizon_days: u32,

    /// First hour (UTC) of the daily bootstrap windows
    pub slot_open_hour: u32,

    /// Hour (UTC) at which the last daily bootstrap window ends
    pub slot_close_hour: u32,

    /// Maximum pooled database connections
    pub db_max_connections: u32,

    /// Events buffered for each push subscriber before it starts skipping
    pub push_channel_capacity: usize,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric value cannot be parsed
    /// - The bootstrap hours do not describe a non-empty range within a day
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000)?;
        let ui_url = lookup("UI_URL").unwrap_or_else(|| "http://localhost:5173".to_string());

        // Database settings
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // Request handling
        let request_timeout = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        let reserve_rate_limit = parse_or(&lookup, "RESERVE_RATE_LIMIT", 2)?;
        let reserve_rate_window = parse_or(&lookup, "RESERVE_RATE_WINDOW_SECONDS", 60)?;
        let trust_proxy = parse_or(&lookup, "TRUST_PROXY", false)?;
        let push_channel_capacity = parse_or(&lookup, "PUSH_CHANNEL_CAPACITY", 256)?;

        // Bootstrap settings
        let slot_horizon_days = parse_or(&lookup, "SLOT_HORIZON_DAYS", 30)?;
        let slot_open_hour = parse_or(&lookup, "SLOT_OPEN_HOUR", 8)?;
        let slot_close_hour = parse_or(&lookup, "SLOT_CLOSE_HOUR", 20)?;
        if slot_open_hour >= slot_close_hour || slot_close_hour > 24 {
            return Err(eyre!(
                "SLOT_OPEN_HOUR ({}) must be before SLOT_CLOSE_HOUR ({}) and both within 0..=24",
                slot_open_hour,
                slot_close_hour
            ));
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            ui_url,
            request_timeout,
            reserve_rate_limit,
            reserve_rate_window,
            trust_proxy,
            slot_horizon_days,
            slot_open_hour,
            slot_close_hour,
            db_max_connections,
            push_channel_capacity,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn reserve_rate_window(&self) -> Duration {
        Duration::from_secs(self.reserve_rate_window)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| eyre!("{}", e))
            .wrap_err_with(|| format!("Invalid {} value: {:?}", key, raw)),
        None => Ok(default),
    }
}
