//! Turns a check-in/check-out interval into day credit and overtime tiers.
//!
//! All arithmetic is carried in whole seconds and rounded once per bucket
//! to hundredths of an hour (half-up), so the results are exact.

use crate::errors::{AppError, AppResult};
use crate::models::hours::HourBreakdown;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

const SECS_PER_HOUR: i64 = 3600;

/// Shifts of at least this many hours earn a full base unit.
const FULL_DAY_MIN_HOURS: i64 = 5;

/// Width of the 60% overtime tier.
const OVERTIME_60_SPAN_HOURS: i64 = 2;

pub const DEFAULT_STANDARD_THRESHOLD_HOURS: f64 = 9.0;
pub const DEFAULT_SUNDAY_OVERTIME_100_CREDIT: f64 = 8.0;

/// Tunables of the overtime rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursPolicy {
    /// Hours after which overtime starts on non-Sunday days.
    pub standard_threshold_hours: f64,
    /// Flat 100% overtime credited for any worked Sunday.
    pub sunday_overtime_100_credit: f64,
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            standard_threshold_hours: DEFAULT_STANDARD_THRESHOLD_HOURS,
            sunday_overtime_100_credit: DEFAULT_SUNDAY_OVERTIME_100_CREDIT,
        }
    }
}

impl HoursPolicy {
    pub fn with_threshold(standard_threshold_hours: f64) -> Self {
        Self {
            standard_threshold_hours,
            ..Self::default()
        }
    }
}

/// Round seconds to hundredths of an hour, half-up.
fn secs_to_hours(secs: i64) -> f64 {
    let hundredths = (secs * 100 + SECS_PER_HOUR / 2).div_euclid(SECS_PER_HOUR);
    hundredths as f64 / 100.0
}

fn hours_to_secs(hours: f64) -> i64 {
    (hours * SECS_PER_HOUR as f64).round() as i64
}

/// Compute the breakdown for one worker-day.
///
/// - no check-out → all zeros
/// - check-out before check-in → `InvalidInterval`
/// - Sunday → one base unit plus the flat 100% credit when any time was worked
/// - otherwise the excess over the threshold fills the 60% tier (2h) then the 100% tier
pub fn compute_hours(
    check_in: NaiveDateTime,
    check_out: Option<NaiveDateTime>,
    date: NaiveDate,
    policy: &HoursPolicy,
) -> AppResult<HourBreakdown> {
    let Some(check_out) = check_out else {
        return Ok(HourBreakdown::zero());
    };

    if check_out < check_in {
        return Err(AppError::InvalidInterval {
            check_in,
            check_out,
        });
    }

    let worked = (check_out - check_in).num_seconds();
    let total_hours = secs_to_hours(worked);

    let base_units = if worked >= FULL_DAY_MIN_HOURS * SECS_PER_HOUR {
        1.0
    } else {
        0.5
    };

    if date.weekday() == Weekday::Sun {
        let overtime_100 = if worked > 0 {
            secs_to_hours(hours_to_secs(policy.sunday_overtime_100_credit))
        } else {
            0.0
        };

        return Ok(HourBreakdown {
            total_hours,
            base_units: 1.0,
            overtime_60: 0.0,
            overtime_100,
        });
    }

    let threshold = hours_to_secs(policy.standard_threshold_hours).max(0);
    let excess = (worked - threshold).max(0);
    let tier_60 = excess.min(OVERTIME_60_SPAN_HOURS * SECS_PER_HOUR);
    let tier_100 = excess - tier_60;

    Ok(HourBreakdown {
        total_hours,
        base_units,
        overtime_60: secs_to_hours(tier_60),
        overtime_100: secs_to_hours(tier_100),
    })
}
