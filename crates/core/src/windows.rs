use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A time window to be inserted as an available slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Generates one-hour UTC windows for `days` consecutive days starting at `from`.
///
/// Each day gets windows starting at `open_hour`, `open_hour + 1`, ..., `close_hour - 1`.
/// An empty range (`open_hour >= close_hour`) yields no windows.
pub fn generate_daily_windows(
    from: NaiveDate,
    days: u32,
    open_hour: u32,
    close_hour: u32,
) -> Vec<SlotWindow> {
    let close_hour = close_hour.min(24);
    let hours = open_hour..close_hour;

    (0..i64::from(days))
        .filter_map(|offset| from.checked_add_signed(Duration::days(offset)))
        .flat_map(|date| {
            hours.clone().filter_map(move |hour| {
                let start = date.and_hms_opt(hour, 0, 0)?;
                let start_time = Utc.from_utc_datetime(&start);
                Some(SlotWindow {
                    start_time,
                    end_time: start_time + Duration::hours(1),
                })
            })
        })
        .collect()
}
