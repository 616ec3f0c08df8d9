use crate::cli::parser::{Commands, PunchArgs};
use crate::config::Config;
use crate::core::capture::EvidenceCapture;
use crate::core::recorder::{AttendanceRecorder, CheckOutcome};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attendance::{Punch, format_timestamp};
use crate::models::geo::GeoPoint;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date_or_today;
use crate::utils::path::expand_tilde;
use crate::utils::time::resolve_punch_time;
use chrono::NaiveDate;
use std::fs;

/// Handle `checkin` and `checkout`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Checkin { punch } => {
            let (date, p) = build_punch(punch)?;
            let pool = DbPool::open(&cfg.database)?;
            let recorder = AttendanceRecorder::new(&pool, cfg.geofence_radius_m);

            let outcome = recorder.check_in(&punch.worker, date, p)?;

            success(format!(
                "Check-in recorded for {} on {} at {} (record {}).",
                punch.worker,
                date,
                stamp(&outcome, true),
                outcome.record.id
            ));
            report_geofence(&outcome, cfg.geofence_radius_m, None);
        }
        Commands::Checkout { punch, confirm } => {
            let (date, p) = build_punch(punch)?;
            let pool = DbPool::open(&cfg.database)?;
            let recorder = AttendanceRecorder::new(&pool, cfg.geofence_radius_m);

            let outcome = recorder.check_out(&punch.worker, date, p, *confirm)?;

            success(format!(
                "Check-out recorded for {} on {} at {} (record {}).",
                punch.worker,
                date,
                stamp(&outcome, false),
                outcome.record.id
            ));
            report_geofence(&outcome, cfg.geofence_radius_m, Some(*confirm));
        }
        _ => {}
    }

    Ok(())
}

/// Resolve the date, the punch time, the location fix and the evidence.
fn build_punch(args: &PunchArgs) -> AppResult<(NaiveDate, Punch)> {
    let date = parse_date_or_today(args.date.as_deref())?;
    let at = resolve_punch_time(args.at.as_deref(), date)?;

    // coordinates typed on the command line are already a fix
    let location = GeoPoint::from_parts(args.lat, args.lon)?;

    let mut evidence = EvidenceCapture::new();
    if let Some(photo) = &args.photo {
        evidence.capture(fs::read(expand_tilde(photo))?);
    }

    let punch = Punch::new(at)
        .with_location(location)
        .with_evidence(evidence.take())
        .with_note(args.note.clone());

    Ok((date, punch))
}

fn stamp(outcome: &CheckOutcome, check_in: bool) -> String {
    let ts = if check_in {
        outcome.record.check_in_time
    } else {
        outcome.record.check_out_time
    };
    ts.as_ref().map(format_timestamp).unwrap_or_default()
}

fn report_geofence(outcome: &CheckOutcome, radius_m: f64, confirmed: Option<bool>) {
    let fence = &outcome.geofence;

    match fence.distance_meters {
        Some(d) if fence.within_range => info(format!("📍 {d:.0} m from site.")),
        Some(d) => {
            warning(format!(
                "📍 Out of range: {d:.0} m from site (limit {radius_m:.0} m)."
            ));
            if confirmed == Some(false) {
                warning("Recorded as not confirmed; use --confirm to acknowledge.");
            }
        }
        None => info("📍 Distance unknown (no GPS fix or site without coordinates)."),
    }
}
