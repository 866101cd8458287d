//! # Request Extractors
//!
//! Body extraction for the slot action endpoints. An empty body is the same as
//! `{}`, so a missing `nurse_id` is reported as such. A body that is present but
//! cannot be decoded is rejected with the decoder's message.

use axum::{
    Json, async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use slotbook_core::{errors::BookingError, models::requests::SlotActionRequest};

use crate::middleware::error_handling::AppError;

/// Body of a reserve or cancel request.
#[derive(Debug, Clone, Default)]
pub struct ActionPayload(pub SlotActionRequest);

#[async_trait]
impl<S> FromRequest<S> for ActionPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = has_json_content_type(&request);
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| BookingError::validation(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        if !json_content {
            return Err(BookingError::validation(
                "Expected request with `Content-Type: application/json`",
            )
            .into());
        }

        let Json(body) = Json::<SlotActionRequest>::from_bytes(&bytes)
            .map_err(|rejection| BookingError::validation(rejection.body_text()))?;
        Ok(Self(body))
    }
}

fn has_json_content_type(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
