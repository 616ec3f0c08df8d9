//! Attendance state machine for one worker-day.
//!
//! `NONE → CHECKED_IN → CHECKED_OUT`, with `VALIDATED` as a terminal overlay
//! reachable from either of the two recorded states. Storage is the single
//! source of truth: every operation re-reads the row it acts on.

pub mod lock;

use crate::core::geo;
use crate::db::log::audit_or_warn;
use crate::db::pool::DbPool;
use crate::db::queries::{
    find_attendance, find_attendance_by_id, find_project, find_worker, insert_attendance,
    mark_validated, update_check_out,
};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceState, Punch, format_timestamp};
use crate::models::geo::{GeoFenceResult, GeoPoint};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Result of a check action: the stored record and the advisory
/// geofence classification, so a front-end can show a confirmation.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub record: AttendanceRecord,
    pub geofence: GeoFenceResult,
}

pub struct AttendanceRecorder<'a> {
    pool: &'a DbPool,
    radius_m: f64,
}

/// Observation text for a geofence classification, if it deserves one.
/// `confirmed` is only set for check-outs.
fn geofence_note(
    action: &str,
    location: Option<GeoPoint>,
    fence: &GeoFenceResult,
    radius_m: f64,
    confirmed: Option<bool>,
) -> Option<String> {
    if location.is_none() {
        return Some(format!("{action}: no GPS fix, location not recorded"));
    }

    if fence.within_range {
        return None;
    }

    let distance = fence.distance_meters?;
    let mut note = format!("{action} out of range: {distance:.0} m from site (limit {radius_m:.0} m)");
    match confirmed {
        Some(true) => note.push_str(", confirmed by worker"),
        Some(false) => note.push_str(", not confirmed"),
        None => {}
    }
    Some(note)
}

impl<'a> AttendanceRecorder<'a> {
    pub fn new(pool: &'a DbPool, radius_m: f64) -> Self {
        Self { pool, radius_m }
    }

    fn site_of(conn: &Connection, project_id: Option<&str>) -> AppResult<Option<GeoPoint>> {
        let Some(id) = project_id else {
            return Ok(None);
        };
        // an unknown project behaves like one without coordinates
        Ok(find_project(conn, id)?.and_then(|p| p.site))
    }

    /// Current lifecycle state of (worker, date).
    pub fn state_of(&self, worker_id: &str, date: NaiveDate) -> AppResult<AttendanceState> {
        Ok(find_attendance(&self.pool.conn, worker_id, date)?
            .map(|r| r.state())
            .unwrap_or(AttendanceState::None))
    }

    /// Open the worker-day record. Legal only when no record exists yet,
    /// and only with a punch on `date` itself.
    pub fn check_in(
        &self,
        worker_id: &str,
        date: NaiveDate,
        punch: Punch,
    ) -> AppResult<CheckOutcome> {
        let conn = &self.pool.conn;

        if punch.at.date() != date {
            return Err(AppError::InvalidDate(format!(
                "check-in at {} does not fall on {date}",
                format_timestamp(&punch.at)
            )));
        }

        let worker =
            find_worker(conn, worker_id)?.ok_or_else(|| AppError::UnknownWorker(worker_id.into()))?;

        if find_attendance(conn, worker_id, date)?.is_some() {
            return Err(AppError::DuplicateCheckIn {
                worker_id: worker_id.to_string(),
                date,
            });
        }

        let site = Self::site_of(conn, worker.project_id.as_deref())?;
        let fence = geo::classify(punch.location, site, self.radius_m);
        let note = punch.note.clone();
        let location = punch.location;

        let mut record = AttendanceRecord::opened(worker_id, date, worker.project_id, punch);
        if let Some(n) = geofence_note("check-in", location, &fence, self.radius_m, None) {
            record.append_observation(&n);
        }
        if let Some(n) = note {
            record.append_observation(n.trim());
        }

        // the UNIQUE index turns a lost race into DuplicateCheckIn as well
        record.id = insert_attendance(conn, &record)?;

        audit_or_warn(
            conn,
            "check_in",
            &format!("{worker_id}@{date}"),
            &format!(
                "Checked in at {}{}",
                record
                    .check_in_time
                    .as_ref()
                    .map(format_timestamp)
                    .unwrap_or_default(),
                if fence.within_range { "" } else { " (out of range)" }
            ),
        );

        Ok(CheckOutcome {
            record,
            geofence: fence,
        })
    }

    /// Close the worker-day record.
    ///
    /// Out-of-range never blocks: `out_of_range_confirmed` only changes the
    /// observation text.
    pub fn check_out(
        &self,
        worker_id: &str,
        date: NaiveDate,
        punch: Punch,
        out_of_range_confirmed: bool,
    ) -> AppResult<CheckOutcome> {
        let tx = self.pool.conn.unchecked_transaction()?;

        let no_open = || AppError::NoOpenCheckIn {
            worker_id: worker_id.to_string(),
            date,
        };

        let mut record = find_attendance(&tx, worker_id, date)?.ok_or_else(no_open)?;

        let site = Self::site_of(&tx, record.project_reference.as_deref())?;
        let fence = geo::classify(punch.location, site, self.radius_m);
        let radius_m = self.radius_m;
        let at = punch.at;

        // the lock is checked first; the state checks run on the draft
        lock::guarded_edit(&mut record, |r| {
            if r.check_out_time.is_some() {
                return Err(no_open());
            }

            if let Some(check_in) = r.check_in_time
                && at < check_in
            {
                return Err(AppError::InvalidInterval {
                    check_in,
                    check_out: at,
                });
            }

            r.check_out_time = Some(at);
            r.check_out_location = punch.location;
            r.check_out_evidence = punch.evidence;
            if let Some(n) = geofence_note(
                "check-out",
                punch.location,
                &fence,
                radius_m,
                Some(out_of_range_confirmed),
            ) {
                r.append_observation(&n);
            }
            if let Some(n) = &punch.note {
                r.append_observation(n.trim());
            }
            Ok(())
        })?;

        if update_check_out(&tx, &record)? != 1 {
            // the row changed underneath us; report what it looks like now
            let current = find_attendance(&tx, worker_id, date)?.ok_or_else(no_open)?;
            lock::ensure_unlocked(&current)?;
            return Err(no_open());
        }

        tx.commit()?;

        audit_or_warn(
            &self.pool.conn,
            "check_out",
            &format!("{worker_id}@{date}"),
            &format!(
                "Checked out at {}{}",
                format_timestamp(&at),
                match (fence.within_range, out_of_range_confirmed) {
                    (true, _) => "",
                    (false, true) => " (out of range, confirmed)",
                    (false, false) => " (out of range, unconfirmed)",
                }
            ),
        );

        Ok(CheckOutcome {
            record,
            geofence: fence,
        })
    }

    /// Supervisor sign-off. Idempotent on an already validated record.
    pub fn validate(&self, record_id: i64) -> AppResult<AttendanceRecord> {
        let tx = self.pool.conn.unchecked_transaction()?;

        let record =
            find_attendance_by_id(&tx, record_id)?.ok_or(AppError::RecordNotFound(record_id))?;

        if record.is_validated() {
            return Ok(record);
        }

        mark_validated(&tx, record_id)?;
        let validated =
            find_attendance_by_id(&tx, record_id)?.ok_or(AppError::RecordNotFound(record_id))?;
        tx.commit()?;

        audit_or_warn(
            &self.pool.conn,
            "validate",
            &format!("{}@{}", validated.worker_id, validated.date),
            &format!("Record {record_id} validated"),
        );

        Ok(validated)
    }
}
