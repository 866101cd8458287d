//! HTTP client for the SlotBook API.

use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use slotbook_core::models::{
    requests::{ErrorResponse, ResetResponse, SlotActionRequest},
    slot::{Slot, SlotStatus},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error status; `message` is its `error` field.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct SlotsClient {
    http: Client,
    base_url: String,
}

impl SlotsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_available(&self) -> ClientResult<Vec<Slot>> {
        self.list_by_status(SlotStatus::Available).await
    }

    pub async fn list_by_status(&self, status: SlotStatus) -> ClientResult<Vec<Slot>> {
        let response = self
            .http
            .get(format!("{}/slots", self.base_url))
            .query(&[("status", status.as_str())])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> ClientResult<Vec<Slot>> {
        let response = self
            .http
            .get(format!("{}/slots/{}", self.base_url, date.format("%Y-%m-%d")))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn reserve(&self, id: i32, nurse_id: &str) -> ClientResult<Slot> {
        self.slot_action(id, "reserve", nurse_id).await
    }

    pub async fn cancel(&self, id: i32, nurse_id: &str) -> ClientResult<Slot> {
        self.slot_action(id, "cancel", nurse_id).await
    }

    pub async fn reset(&self) -> ClientResult<ResetResponse> {
        let response = self
            .http
            .post(format!("{}/slots/reset", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }

    async fn slot_action(&self, id: i32, action: &str, nurse_id: &str) -> ClientResult<Slot> {
        let request = SlotActionRequest {
            nurse_id: Some(nurse_id.to_string()),
            start_time: None,
        };
        let response = self
            .http
            .post(format!("{}/slots/{}/{}", self.base_url, id, action))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
