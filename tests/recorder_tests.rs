mod common;
use common::{date, seeded_pool, site, ts};
use rtareo::core::geo::{DEFAULT_RADIUS_M, EARTH_RADIUS_M};
use rtareo::core::recorder::AttendanceRecorder;
use rtareo::core::recorder::lock::{ensure_unlocked, guarded_edit};
use rtareo::db::pool::DbPool;
use rtareo::db::queries::{find_attendance, insert_attendance};
use rtareo::errors::AppError;
use rtareo::models::attendance::{AttendanceRecord, AttendanceState, Punch, ValidationStatus};
use rtareo::models::geo::GeoPoint;

fn far_from_site(meters: f64) -> GeoPoint {
    let s = site();
    GeoPoint::new(s.latitude + (meters / EARTH_RADIUS_M).to_degrees(), s.longitude).unwrap()
}

fn at_site(at: &str) -> Punch {
    Punch::new(ts(at)).with_location(Some(site()))
}

/// Raw column dump, used to check that a rejected operation wrote nothing.
fn raw_row(pool: &DbPool, id: i64) -> Vec<String> {
    pool.conn
        .query_row(
            "SELECT quote(worker_id), quote(date), quote(check_in_time), quote(check_out_time),
                    quote(check_in_lat), quote(check_in_lon), quote(check_out_lat),
                    quote(check_out_lon), quote(check_in_evidence), quote(check_out_evidence),
                    quote(observation), quote(validation_status), quote(project_ref),
                    quote(created_at)
             FROM attendance WHERE id = ?1",
            [id],
            |row| (0..14).map(|i| row.get::<_, String>(i)).collect(),
        )
        .unwrap()
}

fn log_count(pool: &DbPool, operation: &str) -> i64 {
    pool.conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = ?1",
            [operation],
            |row| row.get(0),
        )
        .unwrap()
}

#[test]
fn test_full_lifecycle() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-01");

    assert_eq!(rec.state_of("W1", d).unwrap(), AttendanceState::None);

    let inn = rec.check_in("W1", d, at_site("2025-09-01 08:00")).unwrap();
    assert!(inn.record.id > 0);
    assert!(inn.geofence.within_range);
    assert_eq!(inn.record.project_reference.as_deref(), Some("P1"));
    assert_eq!(rec.state_of("W1", d).unwrap(), AttendanceState::CheckedIn);

    let out = rec
        .check_out("W1", d, at_site("2025-09-01 17:00"), false)
        .unwrap();
    assert_eq!(out.record.check_out_time, Some(ts("2025-09-01 17:00")));
    assert_eq!(out.record.observation, "");
    assert_eq!(rec.state_of("W1", d).unwrap(), AttendanceState::CheckedOut);

    let validated = rec.validate(out.record.id).unwrap();
    assert_eq!(validated.validation_status, ValidationStatus::Validated);
    assert_eq!(rec.state_of("W1", d).unwrap(), AttendanceState::Validated);

    assert_eq!(log_count(&pool, "check_in"), 1);
    assert_eq!(log_count(&pool, "check_out"), 1);
    assert_eq!(log_count(&pool, "validate"), 1);
}

#[test]
fn test_second_check_in_is_duplicate() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-02");

    rec.check_in("W1", d, at_site("2025-09-02 08:00")).unwrap();
    let err = rec
        .check_in("W1", d, at_site("2025-09-02 09:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateCheckIn { .. }));

    // the first record is untouched
    let stored = find_attendance(&pool.conn, "W1", d).unwrap().unwrap();
    assert_eq!(stored.check_in_time, Some(ts("2025-09-02 08:00")));

    // another worker on the same day is fine
    rec.check_in("W2", d, Punch::new(ts("2025-09-02 08:00")))
        .unwrap();
}

#[test]
fn test_unique_index_rejects_a_racing_insert() {
    let pool = seeded_pool();
    let d = date("2025-09-02");

    let record =
        AttendanceRecord::opened("W1", d, Some("P1".into()), at_site("2025-09-02 08:00"));
    insert_attendance(&pool.conn, &record).unwrap();

    let err = insert_attendance(&pool.conn, &record).unwrap_err();
    assert!(matches!(err, AppError::DuplicateCheckIn { .. }));
}

#[test]
fn test_check_out_without_check_in() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);

    let err = rec
        .check_out("W1", date("2025-09-03"), at_site("2025-09-03 17:00"), false)
        .unwrap_err();
    assert!(matches!(err, AppError::NoOpenCheckIn { .. }));
}

#[test]
fn test_second_check_out_is_rejected() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-03");

    rec.check_in("W1", d, at_site("2025-09-03 08:00")).unwrap();
    rec.check_out("W1", d, at_site("2025-09-03 17:00"), false)
        .unwrap();

    let err = rec
        .check_out("W1", d, at_site("2025-09-03 18:00"), false)
        .unwrap_err();
    assert!(matches!(err, AppError::NoOpenCheckIn { .. }));

    let stored = find_attendance(&pool.conn, "W1", d).unwrap().unwrap();
    assert_eq!(stored.check_out_time, Some(ts("2025-09-03 17:00")));
}

#[test]
fn test_check_out_before_check_in_is_invalid() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-04");

    let inn = rec.check_in("W1", d, at_site("2025-09-04 08:00")).unwrap();
    let before = raw_row(&pool, inn.record.id);

    let err = rec
        .check_out("W1", d, at_site("2025-09-04 07:59"), false)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInterval { .. }));
    assert_eq!(raw_row(&pool, inn.record.id), before);
}

#[test]
fn test_validated_record_is_locked_and_unchanged() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-05");

    let inn = rec.check_in("W1", d, at_site("2025-09-05 08:00")).unwrap();
    rec.validate(inn.record.id).unwrap();

    let before = raw_row(&pool, inn.record.id);
    let err = rec
        .check_out(
            "W1",
            d,
            Punch::new(ts("2025-09-05 17:00"))
                .with_location(Some(far_from_site(2_000.0)))
                .with_evidence(Some(vec![1, 2, 3]))
                .with_note(Some("late".into())),
            true,
        )
        .unwrap_err();

    assert!(matches!(err, AppError::RecordLocked(id) if id == inn.record.id));
    assert_eq!(raw_row(&pool, inn.record.id), before);
    assert_eq!(log_count(&pool, "check_out"), 0);
}

#[test]
fn test_locked_check_wins_over_already_checked_out() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-05");

    rec.check_in("W1", d, at_site("2025-09-05 08:00")).unwrap();
    let out = rec
        .check_out("W1", d, at_site("2025-09-05 17:00"), false)
        .unwrap();
    rec.validate(out.record.id).unwrap();

    let err = rec
        .check_out("W1", d, at_site("2025-09-05 18:00"), false)
        .unwrap_err();
    assert!(matches!(err, AppError::RecordLocked(_)));
}

#[test]
fn test_locked_check_wins_over_invalid_interval() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-05");

    let inn = rec.check_in("W1", d, at_site("2025-09-05 08:00")).unwrap();
    rec.validate(inn.record.id).unwrap();
    let before = raw_row(&pool, inn.record.id);

    let err = rec
        .check_out("W1", d, at_site("2025-09-05 07:00"), false)
        .unwrap_err();
    assert!(matches!(err, AppError::RecordLocked(id) if id == inn.record.id));
    assert_eq!(raw_row(&pool, inn.record.id), before);
    assert_eq!(log_count(&pool, "check_out"), 0);
}

#[test]
fn test_validate_is_idempotent() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-05");

    let inn = rec.check_in("W1", d, at_site("2025-09-05 08:00")).unwrap();
    let first = rec.validate(inn.record.id).unwrap();
    let second = rec.validate(inn.record.id).unwrap();

    assert_eq!(first, second);
    assert_eq!(log_count(&pool, "validate"), 1);
}

#[test]
fn test_validate_unknown_record() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);

    assert!(matches!(
        rec.validate(999).unwrap_err(),
        AppError::RecordNotFound(999)
    ));
}

#[test]
fn test_unknown_worker_cannot_check_in() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);

    let err = rec
        .check_in("NOPE", date("2025-09-01"), at_site("2025-09-01 08:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::UnknownWorker(_)));
}

#[test]
fn test_out_of_range_check_in_is_recorded_with_observation() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-01");

    let inn = rec
        .check_in(
            "W1",
            d,
            Punch::new(ts("2025-09-01 08:00")).with_location(Some(far_from_site(800.0))),
        )
        .unwrap();

    assert!(!inn.geofence.within_range);
    assert!(inn.geofence.distance_meters.unwrap() > 500.0);
    assert!(inn.record.observation.contains("check-in out of range"));
    assert!(inn.record.observation.contains("limit 500 m"));
}

#[test]
fn test_out_of_range_check_out_confirmation_is_noted() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);

    for (day, confirmed, expected) in [
        ("2025-09-01", true, "confirmed by worker"),
        ("2025-09-02", false, "not confirmed"),
    ] {
        let d = date(day);
        rec.check_in("W1", d, at_site(&format!("{day} 08:00")))
            .unwrap();
        let out = rec
            .check_out(
                "W1",
                d,
                Punch::new(ts(&format!("{day} 17:00"))).with_location(Some(far_from_site(900.0))),
                confirmed,
            )
            .unwrap();

        assert_eq!(out.record.state(), AttendanceState::CheckedOut);
        assert!(out.record.observation.starts_with("check-out out of range"));
        assert!(out.record.observation.contains(expected));
    }
}

#[test]
fn test_missing_gps_still_records_attendance() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-01");

    let inn = rec
        .check_in(
            "W1",
            d,
            Punch::new(ts("2025-09-01 08:00")).with_note(Some("  phone died ".into())),
        )
        .unwrap();

    assert_eq!(inn.geofence.distance_meters, None);
    assert!(inn.geofence.within_range);
    assert_eq!(inn.record.check_in_location, None);
    assert_eq!(
        inn.record.observation,
        "check-in: no GPS fix, location not recorded | phone died"
    );
}

#[test]
fn test_project_without_site_is_fail_open() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);

    // W2 works on P2 (no coordinates), W3 has no project at all
    for worker in ["W2", "W3"] {
        let inn = rec
            .check_in(
                worker,
                date("2025-09-01"),
                Punch::new(ts("2025-09-01 08:00")).with_location(Some(far_from_site(50_000.0))),
            )
            .unwrap();
        assert_eq!(inn.geofence.distance_meters, None);
        assert!(inn.geofence.within_range);
        assert_eq!(inn.record.observation, "");
    }
}

#[test]
fn test_evidence_is_stored_verbatim() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-01");

    rec.check_in(
        "W1",
        d,
        at_site("2025-09-01 08:00").with_evidence(Some(vec![0xFF, 0xD8, 0x00])),
    )
    .unwrap();
    rec.check_out(
        "W1",
        d,
        at_site("2025-09-01 17:00").with_evidence(Some(b"jpeg".to_vec())),
        false,
    )
    .unwrap();

    let stored = find_attendance(&pool.conn, "W1", d).unwrap().unwrap();
    assert_eq!(stored.check_in_evidence, Some(vec![0xFF, 0xD8, 0x00]));
    assert_eq!(stored.check_out_evidence, Some(b"jpeg".to_vec()));
}

#[test]
fn test_check_out_after_midnight() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    let d = date("2025-09-05");

    rec.check_in("W1", d, at_site("2025-09-05 20:00")).unwrap();
    let out = rec
        .check_out("W1", d, at_site("2025-09-06 04:00"), false)
        .unwrap();

    assert_eq!(out.record.date, d);
    assert_eq!(out.record.check_out_time, Some(ts("2025-09-06 04:00")));
}

#[test]
fn test_check_in_must_fall_on_record_date() {
    let pool = seeded_pool();
    let rec = AttendanceRecorder::new(&pool, DEFAULT_RADIUS_M);
    // a Sunday key with a Wednesday punch would earn the Sunday credit
    let sunday = date("2025-09-07");

    let err = rec
        .check_in("W1", sunday, at_site("2025-09-10 08:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
    assert_eq!(rec.state_of("W1", sunday).unwrap(), AttendanceState::None);
    assert_eq!(log_count(&pool, "check_in"), 0);

    let err = rec
        .check_in("W1", sunday, at_site("2025-09-06 23:30"))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));

    rec.check_in("W1", sunday, at_site("2025-09-07 08:00")).unwrap();
    assert_eq!(rec.state_of("W1", sunday).unwrap(), AttendanceState::CheckedIn);
}

#[test]
fn test_guarded_edit_refuses_validated_record() {
    let mut record = AttendanceRecord::opened(
        "W1",
        date("2025-09-01"),
        None,
        Punch::new(ts("2025-09-01 08:00")),
    );
    record.validation_status = ValidationStatus::Validated;
    let before = record.clone();

    assert!(ensure_unlocked(&record).is_err());

    let err = guarded_edit(&mut record, |r| {
        r.append_observation("tampered");
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, AppError::RecordLocked(_)));
    assert_eq!(record, before);
}

#[test]
fn test_guarded_edit_commits_only_on_success() {
    let mut record = AttendanceRecord::opened(
        "W1",
        date("2025-09-01"),
        None,
        Punch::new(ts("2025-09-01 08:00")),
    );
    let before = record.clone();

    let err = guarded_edit(&mut record, |r| {
        r.append_observation("half done");
        Err(AppError::Other("boom".into()))
    });
    assert!(err.is_err());
    assert_eq!(record, before);

    guarded_edit(&mut record, |r| {
        r.append_observation("first");
        r.append_observation("second");
        Ok(())
    })
    .unwrap();
    assert_eq!(record.observation, "first | second");
}
