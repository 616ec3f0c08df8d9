//! Unified application error type.
//! Every module (db, core, cli, export) returns AppError so callers see a
//! single taxonomy, including the attendance rule violations.

use chrono::{NaiveDate, NaiveDateTime};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    // ---------------------------
    // Attendance rules
    // ---------------------------
    #[error("Worker '{worker_id}' already checked in on {date}")]
    DuplicateCheckIn { worker_id: String, date: NaiveDate },

    #[error("Worker '{worker_id}' has no open check-in on {date}")]
    NoOpenCheckIn { worker_id: String, date: NaiveDate },

    #[error("Attendance record {0} is validated and can no longer be modified")]
    RecordLocked(i64),

    #[error("Invalid interval: check-out {check_out} precedes check-in {check_in}")]
    InvalidInterval {
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    },

    #[error("Attendance record {0} not found")]
    RecordNotFound(i64),

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
