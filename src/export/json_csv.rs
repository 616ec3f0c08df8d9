use crate::core::tareo::WeeklyTareo;
use crate::errors::AppResult;
use crate::export::notify_export_success;
use crate::models::tareo::{TareoTable, WeekWindow, WeeklyTareoRow};
use crate::ui::messages::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct TareoDocument<'a> {
    week: WeekWindow,
    day_headers: Vec<String>,
    rows: &'a [WeeklyTareoRow],
}

/// Pretty JSON: the resolved week, its day headers and the numeric rows.
/// Days without a record are `null`.
pub(crate) fn export_json(tareo: &WeeklyTareo, path: &Path) -> AppResult<()> {
    info(format!("Exporting tareo to JSON: {}", path.display()));

    let doc = TareoDocument {
        week: tareo.week,
        day_headers: tareo.week.day_headers().to_vec(),
        rows: &tareo.rows,
    };
    let json = serde_json::to_string_pretty(&doc)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// The header block of the flat table: the week bounds, then each day
/// label placed over its three cells. Every line is as wide as the table.
pub(crate) fn header_block(table: &TareoTable) -> Vec<Vec<String>> {
    let width = table.columns.len();

    let mut week_line = vec![String::new(); width];
    week_line[0] = "week".to_string();
    week_line[1] = format!("{} .. {}", table.week.start, table.week.end);

    let mut days_line = vec![String::new(); width];
    for (i, label) in table.day_headers.iter().enumerate() {
        days_line[2 + i * 3] = label.clone();
    }
    days_line[width - 3] = "week total".to_string();

    vec![week_line, days_line]
}

/// CSV: header block, column names, then one line per worker.
/// Zero cells are written empty.
pub(crate) fn export_csv(tareo: &WeeklyTareo, path: &Path) -> AppResult<()> {
    info(format!("Exporting tareo to CSV: {}", path.display()));

    let table = tareo.table();
    let mut wtr = csv::Writer::from_path(path)?;

    for line in header_block(&table) {
        wtr.write_record(&line)?;
    }
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
