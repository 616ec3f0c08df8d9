use crate::errors::{AppError, AppResult};
use crate::models::attendance::{
    AttendanceRecord, ValidationStatus, format_timestamp, parse_timestamp,
};
use crate::models::geo::GeoPoint;
use crate::models::project::Project;
use crate::models::worker::Worker;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const ATTENDANCE_COLUMNS: &str = "id, worker_id, date, check_in_time, check_out_time,
     check_in_lat, check_in_lon, check_out_lat, check_out_lon,
     check_in_evidence, check_out_evidence,
     observation, validation_status, project_ref, created_at";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn date_to_db(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn point_from_row(row: &Row, lat: &str, lon: &str) -> Result<Option<GeoPoint>> {
    let la: Option<f64> = row.get(lat)?;
    let lo: Option<f64> = row.get(lon)?;
    Ok(match (la, lo) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    })
}

fn timestamp_from_row(row: &Row, col: &str) -> Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidTime(s.clone()))),
    }
}

pub fn map_attendance_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(date_str.clone())))?;

    let status_str: String = row.get("validation_status")?;
    let validation_status = ValidationStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            0,
            AppError::Other(format!("Invalid validation status: {}", status_str)),
        )
    })?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        date,
        check_in_time: timestamp_from_row(row, "check_in_time")?,
        check_out_time: timestamp_from_row(row, "check_out_time")?,
        check_in_location: point_from_row(row, "check_in_lat", "check_in_lon")?,
        check_out_location: point_from_row(row, "check_out_lat", "check_out_lon")?,
        check_in_evidence: row.get("check_in_evidence")?,
        check_out_evidence: row.get("check_out_evidence")?,
        observation: row.get("observation")?,
        validation_status,
        project_reference: row.get("project_ref")?,
        created_at: row.get("created_at")?,
    })
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

pub fn find_attendance(
    conn: &Connection,
    worker_id: &str,
    date: NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE worker_id = ?1 AND date = ?2");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt
        .query_row(params![worker_id, date_to_db(&date)], map_attendance_row)
        .optional()?)
}

pub fn find_attendance_by_id(conn: &Connection, id: i64) -> AppResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_attendance_row).optional()?)
}

/// Records with `start <= date <= end`, optionally for one worker,
/// ordered by date then worker.
pub fn load_attendance_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
    worker_id: Option<&str>,
) -> AppResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance
         WHERE date BETWEEN ?1 AND ?2
           AND (?3 IS NULL OR worker_id = ?3)
         ORDER BY date ASC, worker_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![date_to_db(&start), date_to_db(&end), worker_id],
        map_attendance_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a freshly opened record and return its id.
/// A (worker_id, date) collision becomes `DuplicateCheckIn`.
pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    let result = conn.execute(
        "INSERT INTO attendance (
            worker_id, date, check_in_time, check_out_time,
            check_in_lat, check_in_lon, check_out_lat, check_out_lon,
            check_in_evidence, check_out_evidence,
            observation, validation_status, project_ref, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            rec.worker_id,
            date_to_db(&rec.date),
            rec.check_in_time.as_ref().map(format_timestamp),
            rec.check_out_time.as_ref().map(format_timestamp),
            rec.check_in_location.map(|p| p.latitude),
            rec.check_in_location.map(|p| p.longitude),
            rec.check_out_location.map(|p| p.latitude),
            rec.check_out_location.map(|p| p.longitude),
            rec.check_in_evidence,
            rec.check_out_evidence,
            rec.observation,
            rec.validation_status.to_db_str(),
            rec.project_reference,
            rec.created_at,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(AppError::DuplicateCheckIn {
                worker_id: rec.worker_id.clone(),
                date: rec.date,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Persist the check-out half of a record. Only touches rows that are
/// still open and not yet checked out; returns the number of rows changed.
pub fn update_check_out(conn: &Connection, rec: &AttendanceRecord) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE attendance
         SET check_out_time = ?1,
             check_out_lat = ?2, check_out_lon = ?3,
             check_out_evidence = ?4,
             observation = ?5
         WHERE id = ?6
           AND validation_status = 'OPEN'
           AND check_out_time IS NULL",
        params![
            rec.check_out_time.as_ref().map(format_timestamp),
            rec.check_out_location.map(|p| p.latitude),
            rec.check_out_location.map(|p| p.longitude),
            rec.check_out_evidence,
            rec.observation,
            rec.id,
        ],
    )?;
    Ok(changed)
}

pub fn mark_validated(conn: &Connection, id: i64) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE attendance SET validation_status = 'VALIDATED' WHERE id = ?1",
        [id],
    )?;
    Ok(changed)
}

// ---------------------------------------------------------------------------
// Projects / workers
// ---------------------------------------------------------------------------

fn map_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        site: point_from_row(row, "latitude", "longitude")?,
    })
}

fn map_worker(row: &Row) -> Result<Worker> {
    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
        project_id: row.get("project_id")?,
    })
}

/// Insert or replace a project definition.
pub fn upsert_project(conn: &Connection, project: &Project) -> AppResult<()> {
    conn.execute(
        "INSERT INTO projects (id, name, latitude, longitude, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            latitude = excluded.latitude,
            longitude = excluded.longitude",
        params![
            project.id,
            project.name,
            project.site.map(|p| p.latitude),
            project.site.map(|p| p.longitude),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn find_project(conn: &Connection, id: &str) -> AppResult<Option<Project>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, latitude, longitude FROM projects WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_project).optional()?)
}

pub fn list_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT id, name, latitude, longitude FROM projects ORDER BY id")?;
    let rows = stmt.query_map([], map_project)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or replace a worker; the assigned project must exist.
pub fn upsert_worker(conn: &Connection, worker: &Worker) -> AppResult<()> {
    if let Some(pid) = &worker.project_id
        && find_project(conn, pid)?.is_none()
    {
        return Err(AppError::UnknownProject(pid.clone()));
    }

    conn.execute(
        "INSERT INTO workers (id, name, project_id, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            project_id = excluded.project_id",
        params![
            worker.id,
            worker.name,
            worker.project_id,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn find_worker(conn: &Connection, id: &str) -> AppResult<Option<Worker>> {
    let mut stmt = conn.prepare_cached("SELECT id, name, project_id FROM workers WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_worker).optional()?)
}

pub fn list_workers(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt = conn.prepare("SELECT id, name, project_id FROM workers ORDER BY id")?;
    let rows = stmt.query_map([], map_worker)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
