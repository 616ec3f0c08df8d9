use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTareo
#[derive(Parser)]
#[command(
    name = "rtareo",
    version = env!("CARGO_PKG_VERSION"),
    about = "Record on-site attendance with GPS evidence and build weekly payroll tareos",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "List keys missing from the configuration file")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage projects (worksites)
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage workers
    Worker {
        #[command(subcommand)]
        action: WorkerAction,
    },

    /// Open today's (or --date) attendance record for a worker
    Checkin {
        #[command(flatten)]
        punch: PunchArgs,
    },

    /// Close an open attendance record
    Checkout {
        #[command(flatten)]
        punch: PunchArgs,

        /// Acknowledge an out-of-range check-out
        #[arg(long = "confirm")]
        confirm: bool,
    },

    /// Validate (lock) an attendance record
    Validate {
        /// Record id, as shown by `list`
        id: i64,
    },

    /// List attendance records with their hour breakdown
    List {
        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range like 2025-09-01:2025-09-15"
        )]
        period: Option<String>,

        #[arg(long, short, help = "Only records of this worker")]
        worker: Option<String>,

        #[arg(long = "today", help = "Show only today's records")]
        now: bool,
    },

    /// Build the weekly tareo (Monday to Sunday)
    Tareo {
        /// Any date inside the wanted week (default: today)
        #[arg(long, value_name = "DATE")]
        week: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Write to this absolute path instead of printing a table
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// Arguments shared by check-in and check-out.
#[derive(clap::Args, Debug, Clone)]
pub struct PunchArgs {
    /// Worker id
    #[arg(long, short)]
    pub worker: String,

    /// Attendance date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Punch time: HH:MM[:SS] or "YYYY-MM-DD HH:MM" (default: now, today only)
    #[arg(long)]
    pub at: Option<String>,

    /// Device latitude (omit when there is no GPS fix)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Device longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Evidence file (photo), stored as-is
    #[arg(long, value_name = "FILE")]
    pub photo: Option<String>,

    /// Free-text observation
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Register or update a project
    Add {
        id: String,
        name: String,

        /// Site latitude (omit for projects without a registered location)
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Site longitude
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List projects
    List,
}

#[derive(Subcommand)]
pub enum WorkerAction {
    /// Register or update a worker
    Add {
        id: String,
        name: String,

        /// Assigned project id
        #[arg(long)]
        project: Option<String>,
    },

    /// List workers
    List,
}
