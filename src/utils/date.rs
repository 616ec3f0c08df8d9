use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Months, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse an optional date argument, defaulting to today.
pub fn parse_date_or_today(s: Option<&str>) -> AppResult<NaiveDate> {
    match s {
        Some(raw) => parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.to_string())),
        None => Ok(today()),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// First and last day covered by a single period token.
fn bounds_of(token: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(format!("Invalid period: {token}"));

    match token.len() {
        // YYYY
        4 => {
            let y: i32 = token.parse().map_err(|_| invalid())?;
            let start = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let end = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok((start, end))
        }
        // YYYY-MM
        7 => {
            let start =
                NaiveDate::parse_from_str(&format!("{token}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
            let end = last_day_of_month(start.year(), start.month()).ok_or_else(invalid)?;
            Ok((start, end))
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(token).ok_or_else(invalid)?;
            Ok((d, d))
        }
        _ => Err(invalid()),
    }
}

/// Resolve a `--period` expression into inclusive date bounds.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any two of the above joined by `:` (e.g. `2025-09:2025-10-15`)
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    let (start, end) = match p.split_once(':') {
        Some((a, b)) => (bounds_of(a.trim())?.0, bounds_of(b.trim())?.1),
        None => bounds_of(p)?,
    };

    if end < start {
        return Err(AppError::InvalidDate(format!(
            "Invalid period: {start} is after {end}"
        )));
    }
    Ok((start, end))
}

/// Bounds of the current month, the default listing period.
pub fn current_month() -> AppResult<(NaiveDate, NaiveDate)> {
    let t = today();
    bounds_of(&t.format("%Y-%m").to_string())
}
