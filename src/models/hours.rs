use serde::Serialize;

/// Day credit and overtime tiers for one completed worker-day.
/// Derived on demand from an attendance record; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HourBreakdown {
    pub total_hours: f64,
    pub base_units: f64,
    pub overtime_60: f64,
    pub overtime_100: f64,
}

impl HourBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.total_hours == 0.0
            && self.base_units == 0.0
            && self.overtime_60 == 0.0
            && self.overtime_100 == 0.0
    }

    /// Report cells: base units, 60% and 100% overtime, zero rendered empty.
    pub fn cells(&self) -> [String; 3] {
        [
            report_cell(self.base_units),
            report_cell(self.overtime_60),
            report_cell(self.overtime_100),
        ]
    }
}

/// Zero buckets render as empty strings; anything else with two decimals
/// trimmed of trailing zeros ("1", "0.5", "1.25").
pub fn report_cell(value: f64) -> String {
    if value == 0.0 {
        return String::new();
    }
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Hundredths of an hour, the unit every sum is carried in.
pub(crate) fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub(crate) fn from_hundredths(value: i64) -> f64 {
    value as f64 / 100.0
}
