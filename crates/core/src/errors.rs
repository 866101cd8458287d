use thiserror::Error;

/// Message returned when a reservation loses the race or targets an unknown slot.
pub const SLOT_NOT_AVAILABLE: &str = "Slot not available";

/// Message returned when a cancellation does not match a reserved slot held by the caller.
pub const INVALID_RESERVATION: &str = "Invalid reservation";

/// Message returned for any 5xx; the underlying cause is only logged.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn slot_not_available() -> Self {
        Self::Conflict(SLOT_NOT_AVAILABLE.to_string())
    }

    pub fn invalid_reservation() -> Self {
        Self::Conflict(INVALID_RESERVATION.to_string())
    }

    /// True for failures the caller cannot fix by changing the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// The message that is safe to show to the caller.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            INTERNAL_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
