//! Weekly tareo aggregation.

use super::hours::{HoursPolicy, compute_hours};
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::hours::{HourBreakdown, from_hundredths, to_hundredths};
use crate::models::tareo::{WeekWindow, WeeklyTareoRow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Breakdown of a single record. Records without a check-in count as zero.
pub fn breakdown_for(record: &AttendanceRecord, policy: &HoursPolicy) -> AppResult<HourBreakdown> {
    match record.check_in_time {
        Some(check_in) => compute_hours(check_in, record.check_out_time, record.date, policy),
        None => Ok(HourBreakdown::zero()),
    }
}

fn merge(a: HourBreakdown, b: HourBreakdown) -> HourBreakdown {
    let sum = |x: f64, y: f64| from_hundredths(to_hundredths(x) + to_hundredths(y));
    HourBreakdown {
        total_hours: sum(a.total_hours, b.total_hours),
        base_units: sum(a.base_units, b.base_units),
        overtime_60: sum(a.overtime_60, b.overtime_60),
        overtime_100: sum(a.overtime_100, b.overtime_100),
    }
}

/// Build one row per worker with at least one record in the ISO week
/// containing `reference`.
///
/// Days without a record stay empty. Workers without records in the
/// window get no row at all. The result is deterministic for a given
/// input set, but callers should sort it themselves if order matters.
pub fn aggregate(
    reference: NaiveDate,
    records: &[AttendanceRecord],
    policy: &HoursPolicy,
) -> AppResult<Vec<WeeklyTareoRow>> {
    let week = WeekWindow::containing(reference);

    let mut rows: BTreeMap<&str, WeeklyTareoRow> = BTreeMap::new();

    for record in records {
        let Some(slot) = week.slot_of(record.date) else {
            continue;
        };

        let breakdown = breakdown_for(record, policy)?;

        let row = rows
            .entry(record.worker_id.as_str())
            .or_insert_with(|| WeeklyTareoRow::new(&record.worker_id));

        // duplicates for the same day are summed
        row.days[slot] = Some(match row.days[slot] {
            Some(existing) => merge(existing, breakdown),
            None => breakdown,
        });
    }

    Ok(rows
        .into_values()
        .map(|mut row| {
            row.recompute_totals();
            row
        })
        .collect())
}
