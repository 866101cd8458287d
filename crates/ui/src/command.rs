//! Commands accepted by the terminal calendar.

use chrono::NaiveDate;

pub const HELP: &str = "\
Commands:
  date YYYY-MM-DD   show slots for a day
  next | prev       move the calendar by one month
  available         list every available slot
  reserve <id>      reserve a slot as NURSE_ID
  cancel <id>       cancel your reservation
  reset             make every slot available again
  help              show this message
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Date(NaiveDate),
    NextMonth,
    PrevMonth,
    Available,
    Reserve(i32),
    Cancel(i32),
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Errors are messages for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or("").to_ascii_lowercase();
        let argument = words.next();

        match (name.as_str(), argument) {
            ("date", Some(raw)) => Some(raw)
                .filter(|raw| raw.len() == 10)
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
                .map(Command::Date)
                .ok_or_else(|| "Invalid date format. Use YYYY-MM-DD".to_string()),
            ("next", None) => Ok(Command::NextMonth),
            ("prev", None) => Ok(Command::PrevMonth),
            ("available", None) => Ok(Command::Available),
            ("reserve", Some(raw)) => parse_id(raw).map(Command::Reserve),
            ("cancel", Some(raw)) => parse_id(raw).map(Command::Cancel),
            ("reset", None) => Ok(Command::Reset),
            ("help", _) | ("?", _) => Ok(Command::Help),
            ("quit", _) | ("exit", _) => Ok(Command::Quit),
            ("", _) => Err("Type 'help' for commands".to_string()),
            _ => Err(format!("Unknown command: {}", line.trim())),
        }
    }
}

fn parse_id(raw: &str) -> Result<i32, String> {
    raw.trim_start_matches('#')
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("Not a slot id: {}", raw))
}
