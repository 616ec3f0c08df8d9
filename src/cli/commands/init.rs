use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with --test),
/// then opens the database, which applies every pending migration.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_str = db_path.to_string_lossy().to_string();

    info("⚙️  Initializing rTareo…");
    info(format!("📄 Config file : {}", Config::config_file().display()));
    info(format!("🗄️  Database   : {}", db_str));

    let pool = DbPool::open(&db_str)?;

    success(format!("Database initialized at {}", db_str));

    audit_or_warn(
        &pool.conn,
        "init",
        &db_str,
        &format!("Database initialized at {}", db_str),
    );

    success("rTareo initialization completed!");
    Ok(())
}
