use crate::config::Config;
use crate::core::tareo::TareoLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;
use chrono::NaiveDate;

/// High-level tareo export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the tareo of the week containing `reference`.
    ///
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file (`~/` is expanded)
    /// - `force`: overwrite without asking
    ///
    /// Returns the number of worker rows written.
    pub fn export_tareo(
        pool: &DbPool,
        cfg: &Config,
        reference: NaiveDate,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let tareo = TareoLogic::build(pool, reference, &cfg.hours_policy())?;

        if tareo.rows.is_empty() {
            warning(format!(
                "No attendance found for week {} .. {}.",
                tareo.week.start, tareo.week.end
            ));
            return Ok(0);
        }

        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&tareo, &path)?,
            ExportFormat::Json => export_json(&tareo, &path)?,
        }

        Ok(tareo.rows.len())
    }
}
