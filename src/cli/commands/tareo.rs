use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tareo::TareoLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::hours::{HourBreakdown, report_cell};
use crate::ui::messages::{header, info, warning};
use crate::utils::date::parse_date_or_today;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Tareo {
        week,
        format,
        file,
        force,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;
        let reference = parse_date_or_today(week.as_deref())?;

        if let Some(file) = file {
            let rows = ExportLogic::export_tareo(&pool, cfg, reference, *format, file, *force)?;
            if rows > 0 {
                info(format!("{rows} worker row(s) exported."));
            }
            return Ok(());
        }

        let tareo = TareoLogic::build(&pool, reference, &cfg.hours_policy())?;

        header(format!("Tareo {} .. {}", tareo.week.start, tareo.week.end));

        if tareo.rows.is_empty() {
            warning("No attendance recorded in this week.");
            return Ok(());
        }

        let mut headers = vec!["WORKER".to_string(), "NAME".to_string()];
        headers.extend(tareo.week.day_headers());
        headers.extend(["BASE".to_string(), "OT60".to_string(), "OT100".to_string()]);

        let sep = cfg.separator_char.chars().next().unwrap_or('-');
        let mut table = Table::new(headers, sep);

        for row in &tareo.rows {
            let mut line = vec![
                row.worker_id.clone(),
                row.worker_name.clone().unwrap_or_default(),
            ];
            line.extend(row.days.iter().map(day_cell));
            line.push(report_cell(row.totals.base_units));
            line.push(report_cell(row.totals.overtime_60));
            line.push(report_cell(row.totals.overtime_100));
            table.add_row(line);
        }

        print!("{}", table.render());
        info("Day cells: base [+ot60 @60%] [+ot100 @100%]");
    }

    Ok(())
}

/// "1", "1 +2@60 +1@100", or empty for a day without a record.
fn day_cell(day: &Option<HourBreakdown>) -> String {
    let Some(b) = day else {
        return String::new();
    };

    let base = report_cell(b.base_units);
    let mut parts = vec![if base.is_empty() { "0".to_string() } else { base }];
    if b.overtime_60 > 0.0 {
        parts.push(format!("+{}@60", report_cell(b.overtime_60)));
    }
    if b.overtime_100 > 0.0 {
        parts.push(format!("+{}@100", report_cell(b.overtime_100)));
    }
    parts.join(" ")
}
