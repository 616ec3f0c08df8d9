use super::geo::GeoPoint;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationStatus {
    Open,
    Validated,
}

impl ValidationStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ValidationStatus::Open => "OPEN",
            ValidationStatus::Validated => "VALIDATED",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(ValidationStatus::Open),
            "VALIDATED" => Some(ValidationStatus::Validated),
            _ => None,
        }
    }
}

/// Lifecycle of one worker-day. `None` is the absence of a record;
/// `Validated` overlays either of the other two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceState {
    None,
    CheckedIn,
    CheckedOut,
    Validated,
}

impl AttendanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceState::None => "NONE",
            AttendanceState::CheckedIn => "CHECKED_IN",
            AttendanceState::CheckedOut => "CHECKED_OUT",
            AttendanceState::Validated => "VALIDATED",
        }
    }
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of a check action: when it happened, where the device was
/// (if it got a fix), the captured evidence (if any) and an optional
/// free-text note from the worker.
#[derive(Debug, Clone)]
pub struct Punch {
    pub at: NaiveDateTime,
    pub location: Option<GeoPoint>,
    pub evidence: Option<Vec<u8>>,
    pub note: Option<String>,
}

impl Punch {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at,
            location: None,
            evidence: None,
            note: None,
        }
    }

    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.location = location;
        self
    }

    pub fn with_evidence(mut self, evidence: Option<Vec<u8>>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// One row of the `attendance` table, keyed by (worker_id, date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub worker_id: String,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    #[serde(skip)]
    pub check_in_evidence: Option<Vec<u8>>,
    #[serde(skip)]
    pub check_out_evidence: Option<Vec<u8>>,
    pub observation: String,
    pub validation_status: ValidationStatus,
    pub project_reference: Option<String>,
    pub created_at: String,
}

impl AttendanceRecord {
    /// Fresh record for a check-in; `id = 0` until the store assigns one.
    pub fn opened(
        worker_id: &str,
        date: NaiveDate,
        project_reference: Option<String>,
        punch: Punch,
    ) -> Self {
        Self {
            id: 0,
            worker_id: worker_id.to_string(),
            date,
            check_in_time: Some(punch.at),
            check_out_time: None,
            check_in_location: punch.location,
            check_out_location: None,
            check_in_evidence: punch.evidence,
            check_out_evidence: None,
            observation: String::new(),
            validation_status: ValidationStatus::Open,
            project_reference,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn state(&self) -> AttendanceState {
        if self.is_validated() {
            AttendanceState::Validated
        } else if self.check_out_time.is_some() {
            AttendanceState::CheckedOut
        } else {
            AttendanceState::CheckedIn
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validation_status == ValidationStatus::Validated
    }

    /// Observations only ever grow; new notes are appended after a separator.
    pub fn append_observation(&mut self, note: &str) {
        if note.is_empty() {
            return;
        }
        if !self.observation.is_empty() {
            self.observation.push_str(" | ");
        }
        self.observation.push_str(note);
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT).ok()
}
