pub mod time_utils;

pub use time_utils::{days_remaining, parse_date_like, today, DaysRemaining};
