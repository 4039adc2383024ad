use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::constants::{OVERDUE_MARKER, UNKNOWN_MARKER};

/// Current calendar date in the server's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a date-like string into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; for timestamps only the date part is kept.
pub fn parse_date_like(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Days left until a goal's target date, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemaining {
    /// Target is today or in the future.
    Days(i64),
    /// Target date has passed.
    Overdue,
    /// Target date missing or unparsable.
    Unknown,
}

impl DaysRemaining {
    pub fn between(target_date: Option<NaiveDate>, reference_date: NaiveDate) -> Self {
        match target_date {
            None => DaysRemaining::Unknown,
            Some(target) => {
                let days = (target - reference_date).num_days();
                if days < 0 {
                    DaysRemaining::Overdue
                } else {
                    DaysRemaining::Days(days)
                }
            }
        }
    }

    pub fn parse(target_date: Option<&str>, reference_date: NaiveDate) -> Self {
        Self::between(target_date.and_then(parse_date_like), reference_date)
    }

    /// Urgency ordering: overdue first, then fewest days left, unknown last.
    pub fn urgency_cmp(&self, other: &Self) -> Ordering {
        self.urgency_key().cmp(&other.urgency_key())
    }

    fn urgency_key(&self) -> (u8, i64) {
        match self {
            DaysRemaining::Overdue => (0, 0),
            DaysRemaining::Days(days) => (1, *days),
            DaysRemaining::Unknown => (2, 0),
        }
    }
}

impl fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysRemaining::Days(days) => write!(f, "{}", days),
            DaysRemaining::Overdue => f.write_str(OVERDUE_MARKER),
            DaysRemaining::Unknown => f.write_str(UNKNOWN_MARKER),
        }
    }
}

/// Stringified days remaining until `target_date`.
///
/// Returns a non-negative integer, `"overdue"` for past dates or `"unknown"`
/// when the date is missing or cannot be parsed. Never panics.
pub fn days_remaining(target_date: Option<&str>, reference_date: NaiveDate) -> String {
    DaysRemaining::parse(target_date, reference_date).to_string()
}
