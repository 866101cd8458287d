//! # Error Handling Middleware
//!
//! This module maps domain errors to HTTP status codes and JSON error bodies,
//! so every handler reports failures the same way: `{"error": "<message>"}`.
//!
//! Validation and conflict errors are returned to the caller verbatim. Store
//! and internal failures are logged with their full cause and answered with a
//! generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use slotbook_core::{errors::BookingError, models::requests::ErrorResponse};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::validation::require_nurse_id;
///
/// async fn handler(nurse_id: Option<String>) -> Result<Json<String>, AppError> {
///     let nurse_id = require_nurse_id(nurse_id.as_deref())?;
///     Ok(Json(nurse_id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::BAD_REQUEST,
            BookingError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.0.is_server_error() {
            error!(error = ?self.0, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.public_message(),
        });

        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Store functions return `eyre::Result`; any failure there is a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
