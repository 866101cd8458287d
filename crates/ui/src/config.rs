use std::env;

use eyre::{Result, eyre};
use tracing::Level;

/// Settings for the calendar front-end.
///
/// - `API_URL`: Base URL of the SlotBook API (default: "http://localhost:3000")
/// - `NURSE_ID`: Identity used when reserving or cancelling (required for those actions)
/// - `LOG_LEVEL`: Logging level (default: "info")
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub api_url: String,
    pub nurse_id: Option<String>,
    pub log_level: Level,
}

impl UiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let nurse_id = lookup("NURSE_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse::<Level>()
                .map_err(|_| eyre!("LOG_LEVEL is not a valid level: {}", level))?,
            None => Level::INFO,
        };

        Ok(Self {
            api_url,
            nurse_id,
            log_level,
        })
    }

    /// The nurse identity, or an error naming the missing variable.
    pub fn require_nurse_id(&self) -> Result<&str> {
        self.nurse_id
            .as_deref()
            .ok_or_else(|| eyre!("NURSE_ID must be set to reserve or cancel slots"))
    }
}
