use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Reserved,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "reserved" => Ok(SlotStatus::Reserved),
            _ => Err(BookingError::validation(
                "Invalid status. Use 'available' or 'reserved'",
            )),
        }
    }
}

/// A bookable time window.
///
/// `nurse_id` is set exactly when `status` is [`SlotStatus::Reserved`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub nurse_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Whether the status/holder pairing is consistent.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            SlotStatus::Available => self.nurse_id.is_none(),
            SlotStatus::Reserved => self.nurse_id.as_deref().is_some_and(|n| !n.is_empty()),
        }
    }
}

/// How a reserve or cancel request addresses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKey {
    Id(i32),
    StartTime(DateTime<Utc>),
}

impl SlotKey {
    /// Picks the identifier for a slot action.
    ///
    /// Exactly one identifier must be given: a positive integer id in the path, or a
    /// `start_time` in the body. A body `start_time` is only accepted when the path
    /// segment is not an id.
    pub fn resolve(path_id: &str, start_time: Option<DateTime<Utc>>) -> Result<Self, BookingError> {
        let id = path_id.trim().parse::<i32>().ok().filter(|id| *id > 0);

        match (id, start_time) {
            (Some(_), Some(_)) => Err(BookingError::validation(
                "Provide either slot ID or start_time, not both",
            )),
            (Some(id), None) => Ok(SlotKey::Id(id)),
            (None, Some(start_time)) => Ok(SlotKey::StartTime(start_time)),
            (None, None) => Err(BookingError::validation(
                "Either slot ID or start_time is required",
            )),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Id(id) => write!(f, "id={}", id),
            SlotKey::StartTime(start) => write!(f, "start_time={}", start.to_rfc3339()),
        }
    }
}

/// Events carried over the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum SlotEvent {
    SlotUpdated(Slot),
}

impl SlotEvent {
    pub fn slot(&self) -> &Slot {
        match self {
            SlotEvent::SlotUpdated(slot) => slot,
        }
    }
}
