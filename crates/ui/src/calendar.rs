//! Month grid for picking a day.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate};
use slotbook_core::models::slot::Slot;

/// One row of the grid, Monday first. Days outside the month are `None`.
pub type Week = [Option<NaiveDate>; 7];

/// The month currently shown and the day the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
    selected: NaiveDate,
}

impl MonthView {
    /// Opens on the month containing `today`, with `today` selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            first: first_of_month(today),
            selected: today,
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Selects `date` and shows its month.
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
        self.first = first_of_month(date);
    }

    /// Shows the following month. The selection is kept.
    pub fn next_month(&mut self) {
        if let Some(first) = self.first.checked_add_months(Months::new(1)) {
            self.first = first;
        }
    }

    /// Shows the preceding month. The selection is kept.
    pub fn prev_month(&mut self) {
        if let Some(first) = self.first.checked_sub_months(Months::new(1)) {
            self.first = first;
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    pub fn weeks(&self) -> Vec<Week> {
        let offset = self.first.weekday().num_days_from_monday() as usize;
        let mut weeks = Vec::new();
        let mut week: Week = [None; 7];
        let mut column = offset;

        for day in self.first.iter_days().take(self.days_in_month() as usize) {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }

        weeks
    }

    /// Renders the grid as text.
    ///
    /// The selected day is prefixed with `>` and days in `available` carry a `*`.
    pub fn render(&self, available: &HashSet<NaiveDate>) -> String {
        let mut out = format!("{}\n", self.first.format("%B %Y"));
        out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

        for week in self.weeks() {
            let row: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    Some(day) => format!(
                        "{}{:>2}{}",
                        if *day == self.selected { '>' } else { ' ' },
                        day.day(),
                        if available.contains(day) { '*' } else { ' ' },
                    ),
                    None => "    ".to_string(),
                })
                .collect();
            out.push_str(row.join("").trim_end());
            out.push('\n');
        }

        out
    }
}

/// UTC days on which at least one of `slots` is available.
pub fn available_days<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> HashSet<NaiveDate> {
    slots
        .into_iter()
        .filter(|slot| slot.is_available())
        .map(|slot| slot.start_time.date_naive())
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
