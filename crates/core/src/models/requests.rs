use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::Slot;

/// Body of `POST /slots/:id/reserve` and `POST /slots/:id/cancel`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotActionRequest {
    #[serde(default)]
    pub nurse_id: Option<String>,

    /// Alternate identifier; takes precedence over the path id when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSlotsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingSlotsQuery {
    pub days: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    #[serde(rename = "updatedSlots")]
    pub updated_slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
