use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::hours::HoursPolicy;
use crate::core::calculator::week::breakdown_for;
use crate::db::pool::DbPool;
use crate::db::queries::load_attendance_range;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{RED, color_for_state, colorize_optional, paint};
use crate::utils::date;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        period,
        worker,
        now,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;

        let (start, end) = if *now {
            let d = date::today();
            (d, d)
        } else {
            match period {
                Some(p) => date::parse_period(p)?,
                None => date::current_month()?,
            }
        };

        let records = load_attendance_range(&pool.conn, start, end, worker.as_deref())?;

        if records.is_empty() {
            warning(format!("No attendance records between {start} and {end}."));
            return Ok(());
        }

        header(format!("Attendance {start} .. {end}"));

        let sep = cfg.separator_char.chars().next().unwrap_or('-');
        let policy = cfg.hours_policy();
        let mut table = Table::new(
            vec![
                "ID", "DATE", "WORKER", "STATE", "IN", "OUT", "HOURS", "BASE", "OT60", "OT100",
                "OBSERVATION",
            ],
            sep,
        );

        for rec in &records {
            table.add_row(row_for(rec, &policy));
        }

        print!("{}", table.render());
    }
    Ok(())
}

fn hhmm(ts: Option<NaiveDateTime>, rec: &AttendanceRecord) -> String {
    match ts {
        // a punch on another day keeps its date visible
        Some(t) if t.date() != rec.date => t.format("%Y-%m-%d %H:%M").to_string(),
        Some(t) => t.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

fn row_for(rec: &AttendanceRecord, policy: &HoursPolicy) -> Vec<String> {
    let state = rec.state();
    let mut row = vec![
        rec.id.to_string(),
        rec.date_str(),
        rec.worker_id.clone(),
        paint(state.as_str(), color_for_state(state)),
        colorize_optional(&hhmm(rec.check_in_time, rec)),
        colorize_optional(&hhmm(rec.check_out_time, rec)),
    ];

    match breakdown_for(rec, policy) {
        Ok(b) if rec.check_out_time.is_some() => {
            row.push(format!("{:.2}", b.total_hours));
            row.extend(b.cells());
        }
        Ok(_) => row.extend(["--".to_string(), String::new(), String::new(), String::new()]),
        Err(_) => row.extend([paint("ERR", RED), String::new(), String::new(), String::new()]),
    }

    row.push(rec.observation.clone());
    row
}
