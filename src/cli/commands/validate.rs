use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::recorder::AttendanceRecorder;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Validate { id } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let recorder = AttendanceRecorder::new(&pool, cfg.geofence_radius_m);

        let record = recorder.validate(*id)?;

        success(format!(
            "🔒 Record {} validated ({} on {}).",
            record.id, record.worker_id, record.date
        ));
    }

    Ok(())
}
