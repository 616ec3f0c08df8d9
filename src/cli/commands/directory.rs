use crate::cli::parser::{Commands, ProjectAction, WorkerAction};
use crate::config::Config;
use crate::db::log::audit_or_warn;
use crate::db::pool::DbPool;
use crate::db::queries::{list_projects, list_workers, upsert_project, upsert_worker};
use crate::errors::AppResult;
use crate::models::geo::GeoPoint;
use crate::models::project::Project;
use crate::models::worker::Worker;
use crate::ui::messages::{success, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;

/// Handle `project` and `worker`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;
    let sep = cfg.separator_char.chars().next().unwrap_or('-');

    match cmd {
        Commands::Project { action } => match action {
            ProjectAction::Add { id, name, lat, lon } => {
                let project = Project {
                    id: id.clone(),
                    name: name.clone(),
                    site: GeoPoint::from_parts(*lat, *lon)?,
                };
                upsert_project(&pool.conn, &project)?;

                let site = project
                    .site
                    .map(|s| s.display())
                    .unwrap_or_else(|| "no site coordinates".to_string());
                success(format!("Project '{}' saved ({}).", id, site));
                audit_or_warn(&pool.conn, "project_add", id, &format!("{name} [{site}]"));
            }
            ProjectAction::List => {
                let projects = list_projects(&pool.conn)?;
                if projects.is_empty() {
                    warning("No projects registered.");
                    return Ok(());
                }
                let mut table = Table::new(vec!["ID", "NAME", "SITE"], sep);
                for p in projects {
                    let site = p.site.map(|s| s.display()).unwrap_or_else(|| "--".into());
                    table.add_row(vec![p.id, p.name, colorize_optional(&site)]);
                }
                print!("{}", table.render());
            }
        },
        Commands::Worker { action } => match action {
            WorkerAction::Add { id, name, project } => {
                let worker = Worker {
                    id: id.clone(),
                    name: name.clone(),
                    project_id: project.clone(),
                };
                upsert_worker(&pool.conn, &worker)?;

                success(format!(
                    "Worker '{}' saved{}.",
                    id,
                    project
                        .as_deref()
                        .map(|p| format!(" (project {p})"))
                        .unwrap_or_default()
                ));
                audit_or_warn(&pool.conn, "worker_add", id, name);
            }
            WorkerAction::List => {
                let workers = list_workers(&pool.conn)?;
                if workers.is_empty() {
                    warning("No workers registered.");
                    return Ok(());
                }
                let mut table = Table::new(vec!["ID", "NAME", "PROJECT"], sep);
                for w in workers {
                    let project = w.project_id.unwrap_or_else(|| "--".into());
                    table.add_row(vec![w.id, w.name, colorize_optional(&project)]);
                }
                print!("{}", table.render());
            }
        },
        _ => {}
    }

    Ok(())
}
