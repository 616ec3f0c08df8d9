use crate::core::calculator::hours::HoursPolicy;
use crate::core::calculator::week::aggregate;
use crate::db::pool::DbPool;
use crate::db::queries::{list_workers, load_attendance_range};
use crate::errors::AppResult;
use crate::models::tareo::{TareoTable, WeekWindow, WeeklyTareoRow};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A resolved weekly tareo, ready for rendering.
#[derive(Debug, Clone)]
pub struct WeeklyTareo {
    pub week: WeekWindow,
    pub rows: Vec<WeeklyTareoRow>,
}

impl WeeklyTareo {
    pub fn table(&self) -> TareoTable {
        TareoTable::build(self.week, &self.rows)
    }
}

/// Loads a week of attendance fresh from storage and aggregates it.
pub struct TareoLogic;

impl TareoLogic {
    pub fn build(pool: &DbPool, reference: NaiveDate, policy: &HoursPolicy) -> AppResult<WeeklyTareo> {
        let week = WeekWindow::containing(reference);
        let records = load_attendance_range(&pool.conn, week.start, week.end, None)?;

        let mut rows = aggregate(reference, &records, policy)?;

        let names: HashMap<String, String> = list_workers(&pool.conn)?
            .into_iter()
            .map(|w| (w.id, w.name))
            .collect();

        for row in &mut rows {
            row.worker_name = names.get(&row.worker_id).cloned();
        }

        // report order: by worker id
        rows.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));

        Ok(WeeklyTareo { week, rows })
    }
}
