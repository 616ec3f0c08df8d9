#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rtareo::db::pool::DbPool;
use rtareo::db::queries::{upsert_project, upsert_worker};
use rtareo::models::geo::GeoPoint;
use rtareo::models::project::Project;
use rtareo::models::worker::Worker;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Site of the seeded project "P1" (Lima, Plaza de Armas).
pub const SITE_LAT: f64 = -12.0464;
pub const SITE_LON: f64 = -77.0428;

pub fn rti() -> Command {
    cargo_bin_cmd!("rtareo")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtareo.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid timestamp")
}

pub fn site() -> GeoPoint {
    GeoPoint::new(SITE_LAT, SITE_LON).expect("valid site")
}

/// In-memory store with project P1 (with site), project P2 (no site),
/// worker W1 on P1, W2 on P2 and W3 without project.
pub fn seeded_pool() -> DbPool {
    let pool = DbPool::open_in_memory().expect("open in-memory db");

    upsert_project(
        &pool.conn,
        &Project {
            id: "P1".into(),
            name: "Plaza".into(),
            site: Some(site()),
        },
    )
    .expect("project P1");
    upsert_project(
        &pool.conn,
        &Project {
            id: "P2".into(),
            name: "Warehouse".into(),
            site: None,
        },
    )
    .expect("project P2");

    for (id, name, project) in [
        ("W1", "Ana", Some("P1")),
        ("W2", "Luis", Some("P2")),
        ("W3", "Rosa", None),
    ] {
        upsert_worker(
            &pool.conn,
            &Worker {
                id: id.into(),
                name: name.into(),
                project_id: project.map(String::from),
            },
        )
        .expect("worker");
    }

    pool
}

/// Initialize a DB file through the CLI and register P1/W1 (and W2 on P1).
pub fn init_db_with_directory(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rti()
        .args([
            "--db",
            db_path,
            "project",
            "add",
            "P1",
            "Plaza",
            &format!("--lat={SITE_LAT}"),
            &format!("--lon={SITE_LON}"),
        ])
        .assert()
        .success();

    for (id, name) in [("W1", "Ana"), ("W2", "Luis")] {
        rti()
            .args([
                "--db", db_path, "worker", "add", id, name, "--project", "P1",
            ])
            .assert()
            .success();
    }
}

/// Record a full day for `worker` via the CLI, at the site.
pub fn cli_day(db_path: &str, worker: &str, day: &str, from: &str, to: &str) {
    let lat = format!("--lat={SITE_LAT}");
    let lon = format!("--lon={SITE_LON}");

    rti()
        .args([
            "--db", db_path, "checkin", "--worker", worker, "--date", day, "--at", from, &lat, &lon,
        ])
        .assert()
        .success();

    rti()
        .args([
            "--db", db_path, "checkout", "--worker", worker, "--date", day, "--at", to, &lat, &lon,
        ])
        .assert()
        .success();
}
