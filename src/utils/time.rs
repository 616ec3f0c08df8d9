//! Time utilities: parsing punch times given on the command line and
//! formatting hour values.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

/// Resolve the `--at` argument of a check action.
///
/// Accepts `HH:MM[:SS]` (on `date`) or a full `YYYY-MM-DD HH:MM[:SS]`
/// timestamp, which allows a check-out after midnight. Without a value
/// the current local time is used, which is only allowed when `date` is today.
pub fn resolve_punch_time(at: Option<&str>, date: NaiveDate) -> AppResult<NaiveDateTime> {
    let Some(raw) = at else {
        let now = Local::now().naive_local();
        if now.date() != date {
            return Err(AppError::InvalidTime(format!(
                "--at is required for a punch on {date} (today is {})",
                now.date()
            )));
        }
        return Ok(now);
    };
    let raw = raw.trim();

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts);
        }
    }

    parse_time(raw)
        .map(|t| date.and_time(t))
        .ok_or_else(|| AppError::InvalidTime(raw.to_string()))
}
