mod common;
use common::{date, temp_out, ts};
use rtareo::config::{Config, KNOWN_KEYS};
use rtareo::utils::date::{parse_period, today};
use rtareo::utils::table::Table;
use rtareo::utils::time::resolve_punch_time;
use std::fs;
use std::path::Path;

#[test]
fn test_parse_period_forms() {
    assert_eq!(
        parse_period("2025").unwrap(),
        (date("2025-01-01"), date("2025-12-31"))
    );
    assert_eq!(
        parse_period("2024-02").unwrap(),
        (date("2024-02-01"), date("2024-02-29"))
    );
    assert_eq!(
        parse_period("2025-09-03").unwrap(),
        (date("2025-09-03"), date("2025-09-03"))
    );
    assert_eq!(
        parse_period("2025-09:2025-10-15").unwrap(),
        (date("2025-09-01"), date("2025-10-15"))
    );

    assert!(parse_period("2025-13").is_err());
    assert!(parse_period("2025-10:2025-09").is_err());
    assert!(parse_period("yesterday").is_err());
}

#[test]
fn test_resolve_punch_time() {
    let d = date("2025-09-05");

    assert_eq!(resolve_punch_time(Some("08:15"), d).unwrap(), ts("2025-09-05 08:15"));
    assert_eq!(
        resolve_punch_time(Some("2025-09-06 02:30"), d).unwrap(),
        ts("2025-09-06 02:30")
    );
    assert_eq!(
        resolve_punch_time(Some("07:00:30"), d).unwrap(),
        ts("2025-09-05 07:00") + chrono::Duration::seconds(30)
    );
    assert!(resolve_punch_time(Some("25:00"), d).is_err());
}

#[test]
fn test_punch_time_defaults_to_now_only_for_today() {
    let now = resolve_punch_time(None, today()).unwrap();
    assert_eq!(now.date(), today());

    let err = resolve_punch_time(None, date("2020-01-05")).unwrap_err();
    assert!(err.to_string().contains("--at is required"));

    // an explicit time is fine on any date
    assert_eq!(
        resolve_punch_time(Some("08:00"), date("2020-01-05")).unwrap(),
        ts("2020-01-05 08:00")
    );
}

#[test]
fn test_table_aligns_on_display_width() {
    let mut table = Table::new(vec!["ID", "NAME"], '=');
    assert!(table.is_empty());

    table.add_row(vec!["W1".into(), "Ñandú".into()]);
    table.add_row(vec!["W10".into(), "Ana".into()]);

    let out = table.render();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "ID  | NAME");
    assert_eq!(lines[1], "=".repeat(3 + 3 + 5));
    assert_eq!(lines[2], "W1  | Ñandú");
    assert_eq!(lines[3], "W10 | Ana");
}

#[test]
fn test_config_defaults_when_file_missing() {
    let cfg = Config::load_from(Path::new("/nonexistent/rtareo.conf")).unwrap();
    assert_eq!(cfg.geofence_radius_m, 500.0);
    assert_eq!(cfg.standard_threshold_hours, 9.0);
    assert_eq!(cfg.sunday_overtime_100_credit, 8.0);
    assert_eq!(cfg.separator_char, "-");
}

#[test]
fn test_config_partial_file_and_missing_keys() {
    let path = temp_out("config_partial", "conf");
    let yaml = "database: /tmp/x.sqlite\nstandard_threshold_hours: 8\n";
    fs::write(&path, yaml).unwrap();

    let cfg = Config::load_from(Path::new(&path)).unwrap();
    assert_eq!(cfg.database, "/tmp/x.sqlite");
    assert_eq!(cfg.hours_policy().standard_threshold_hours, 8.0);
    assert_eq!(cfg.geofence_radius_m, 500.0);

    let missing = Config::missing_keys(yaml).unwrap();
    assert_eq!(missing.len(), KNOWN_KEYS.len() - 2);
    assert!(missing.contains(&"geofence_radius_m"));
    assert!(!missing.contains(&"database"));
}

#[test]
fn test_config_rejects_negative_values() {
    let path = temp_out("config_negative", "conf");
    fs::write(&path, "geofence_radius_m: -1\n").unwrap();

    assert!(Config::load_from(Path::new(&path)).is_err());
}
