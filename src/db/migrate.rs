//! Versioned schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the `log`
//! table as `migration_applied` rows, the same table used for the audit
//! trail.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_directory",
        description: "Created projects and workers tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS projects (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            latitude    REAL,
            longitude   REAL,
            created_at  TEXT NOT NULL,
            CHECK ((latitude IS NULL) = (longitude IS NULL))
        );

        CREATE TABLE IF NOT EXISTS workers (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            project_id  TEXT REFERENCES projects(id),
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250901_0002_create_attendance",
        description: "Created attendance table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id          TEXT NOT NULL REFERENCES workers(id),
            date               TEXT NOT NULL,
            check_in_time      TEXT,
            check_out_time     TEXT,
            check_in_lat       REAL,
            check_in_lon       REAL,
            check_out_lat      REAL,
            check_out_lon      REAL,
            observation        TEXT NOT NULL DEFAULT '',
            validation_status  TEXT NOT NULL DEFAULT 'OPEN'
                               CHECK (validation_status IN ('OPEN','VALIDATED')),
            project_ref        TEXT,
            created_at         TEXT NOT NULL,
            CHECK (check_out_time IS NULL OR check_in_time IS NULL
                   OR check_out_time >= check_in_time)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_worker_date
            ON attendance(worker_id, date);
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    },
    Migration {
        version: "20250915_0003_add_attendance_evidence",
        description: "Added evidence columns to attendance",
        sql: r#"
        ALTER TABLE attendance ADD COLUMN check_in_evidence BLOB;
        ALTER TABLE attendance ADD COLUMN check_out_evidence BLOB;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions not yet applied to this database, in order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, each in its own
/// transaction together with its `migration_applied` marker.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            params![m.version, m.description],
        )?;

        tx.commit()?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}
