use super::hours::{HourBreakdown, from_hundredths, report_cell, to_hundredths};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const DAYS_PER_WEEK: usize = 7;

const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The ISO week (Monday..=Sunday) that contains a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn containing(reference: NaiveDate) -> Self {
        let offset = reference.weekday().num_days_from_monday() as i64;
        let start = reference - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Monday-first slot of `date`, or None outside the window.
    pub fn slot_of(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }

    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// "Mon 2025-09-01", ... used as the header block of the report.
    pub fn day_headers(&self) -> [String; DAYS_PER_WEEK] {
        let days = self.days();
        std::array::from_fn(|i| format!("{} {}", DAY_LABELS[i], days[i].format("%Y-%m-%d")))
    }
}

/// Column sums of a tareo row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TareoTotals {
    pub base_units: f64,
    pub overtime_60: f64,
    pub overtime_100: f64,
}

/// One worker's line in the weekly tareo. Days without a record stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTareoRow {
    pub worker_id: String,
    pub worker_name: Option<String>,
    pub days: [Option<HourBreakdown>; DAYS_PER_WEEK],
    pub totals: TareoTotals,
}

impl WeeklyTareoRow {
    pub fn new(worker_id: &str) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            worker_name: None,
            days: [None; DAYS_PER_WEEK],
            totals: TareoTotals::default(),
        }
    }

    /// Recompute the column sums from the day slots.
    pub fn recompute_totals(&mut self) {
        let (mut base, mut ot60, mut ot100) = (0i64, 0i64, 0i64);
        for day in self.days.iter().flatten() {
            base += to_hundredths(day.base_units);
            ot60 += to_hundredths(day.overtime_60);
            ot100 += to_hundredths(day.overtime_100);
        }
        self.totals = TareoTotals {
            base_units: from_hundredths(base),
            overtime_60: from_hundredths(ot60),
            overtime_100: from_hundredths(ot100),
        };
    }

    /// 7×3 day cells followed by the 3 summary cells.
    pub fn cells(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(DAYS_PER_WEEK * 3 + 3);
        for day in &self.days {
            match day {
                Some(b) => out.extend(b.cells()),
                None => out.extend([String::new(), String::new(), String::new()]),
            }
        }
        out.push(report_cell(self.totals.base_units));
        out.push(report_cell(self.totals.overtime_60));
        out.push(report_cell(self.totals.overtime_100));
        out
    }
}

/// Flat table handed to report renderers: a header block naming the
/// resolved week, then one row per worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TareoTable {
    pub week: WeekWindow,
    pub day_headers: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TareoTable {
    pub fn build(week: WeekWindow, rows: &[WeeklyTareoRow]) -> Self {
        let day_headers: Vec<String> = week.day_headers().to_vec();

        let mut columns = vec!["worker_id".to_string(), "worker_name".to_string()];
        for label in DAY_LABELS {
            let l = label.to_lowercase();
            columns.push(format!("{l}_base"));
            columns.push(format!("{l}_ot60"));
            columns.push(format!("{l}_ot100"));
        }
        columns.push("total_base".to_string());
        columns.push("total_ot60".to_string());
        columns.push("total_ot100".to_string());

        let rows = rows
            .iter()
            .map(|r| {
                let mut line = vec![
                    r.worker_id.clone(),
                    r.worker_name.clone().unwrap_or_default(),
                ];
                line.extend(r.cells());
                line
            })
            .collect();

        Self {
            week,
            day_headers,
            columns,
            rows,
        }
    }
}
