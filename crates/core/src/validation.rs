//! Request-shape validation shared by the API handlers.
//!
//! Every function here is pure so handlers can reject a request before any
//! store call is made.

use chrono::{Months, NaiveDate};

use crate::{
    errors::{BookingError, BookingResult},
    models::slot::SlotStatus,
};

/// How far ahead `GET /slots/:date` may look.
pub const MAX_MONTHS_AHEAD: u32 = 3;

/// Bounds for the `days` parameter of the upcoming-slots listing.
pub const MIN_UPCOMING_DAYS: i64 = 1;
pub const MAX_UPCOMING_DAYS: i64 = 10;

/// Longest requester identity the `nurse_id` column holds, in characters.
pub const MAX_NURSE_ID_CHARS: usize = 255;

/// Parses a `YYYY-MM-DD` calendar date and checks it is not more than
/// [`MAX_MONTHS_AHEAD`] months after `today`.
///
/// Past dates are accepted.
pub fn parse_slot_date(raw: &str, today: NaiveDate) -> BookingResult<NaiveDate> {
    let invalid = || BookingError::validation("Invalid date format. Use YYYY-MM-DD");

    if !has_date_shape(raw) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;

    let limit = today
        .checked_add_months(Months::new(MAX_MONTHS_AHEAD))
        .unwrap_or(NaiveDate::MAX);
    if date > limit {
        return Err(BookingError::validation(
            "Date must be within the next 3 months",
        ));
    }

    Ok(date)
}

// Four digits, dash, two digits, dash, two digits.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parses the optional `status` filter, defaulting to available.
pub fn parse_status_filter(raw: Option<&str>) -> BookingResult<SlotStatus> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(status) => status.parse(),
        None => Ok(SlotStatus::Available),
    }
}

/// Parses the `days` parameter of the upcoming-slots listing.
pub fn parse_upcoming_days(raw: Option<&str>) -> BookingResult<u32> {
    let days = raw
        .and_then(|d| d.trim().parse::<i64>().ok())
        .filter(|d| (MIN_UPCOMING_DAYS..=MAX_UPCOMING_DAYS).contains(d))
        .ok_or_else(|| BookingError::validation("Days parameter must be between 1 and 10"))?;

    Ok(days as u32)
}

/// Returns the trimmed requester identity, rejecting a missing, blank or overlong one.
pub fn require_nurse_id(raw: Option<&str>) -> BookingResult<String> {
    let nurse_id = raw
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BookingError::validation("nurse_id is required"))?;

    if nurse_id.chars().count() > MAX_NURSE_ID_CHARS {
        return Err(BookingError::validation(
            "nurse_id must be at most 255 characters",
        ));
    }

    Ok(nurse_id.to_string())
}
