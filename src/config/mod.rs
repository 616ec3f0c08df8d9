use crate::core::calculator::hours::{
    DEFAULT_STANDARD_THRESHOLD_HOURS, DEFAULT_SUNDAY_OVERTIME_100_CREDIT, HoursPolicy,
};
use crate::core::geo::DEFAULT_RADIUS_M;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rtareo";
const CONFIG_FILE: &str = "rtareo.conf";
const DB_FILE: &str = "rtareo.sqlite";

/// Keys every config file is expected to carry.
pub const KNOWN_KEYS: [&str; 5] = [
    "database",
    "geofence_radius_m",
    "standard_threshold_hours",
    "sunday_overtime_100_credit",
    "separator_char",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_radius")]
    pub geofence_radius_m: f64,
    #[serde(default = "default_threshold")]
    pub standard_threshold_hours: f64,
    #[serde(default = "default_sunday_credit")]
    pub sunday_overtime_100_credit: f64,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}
fn default_threshold() -> f64 {
    DEFAULT_STANDARD_THRESHOLD_HOURS
}
fn default_sunday_credit() -> f64 {
    DEFAULT_SUNDAY_OVERTIME_100_CREDIT
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            geofence_radius_m: default_radius(),
            standard_threshold_hours: default_threshold(),
            sunday_overtime_100_credit: default_sunday_credit(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join(APP_DIR)
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(format!(".{APP_DIR}"))
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DB_FILE)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the hour or geofence rules meaningless.
    pub fn validate(&self) -> AppResult<()> {
        if !(self.geofence_radius_m.is_finite() && self.geofence_radius_m >= 0.0) {
            return Err(AppError::Config(format!(
                "geofence_radius_m must be >= 0, got {}",
                self.geofence_radius_m
            )));
        }
        if !(self.standard_threshold_hours.is_finite() && self.standard_threshold_hours >= 0.0) {
            return Err(AppError::Config(format!(
                "standard_threshold_hours must be >= 0, got {}",
                self.standard_threshold_hours
            )));
        }
        if !(self.sunday_overtime_100_credit.is_finite() && self.sunday_overtime_100_credit >= 0.0)
        {
            return Err(AppError::Config(format!(
                "sunday_overtime_100_credit must be >= 0, got {}",
                self.sunday_overtime_100_credit
            )));
        }
        Ok(())
    }

    pub fn hours_policy(&self) -> HoursPolicy {
        HoursPolicy {
            standard_threshold_hours: self.standard_threshold_hours,
            sunday_overtime_100_credit: self.sunday_overtime_100_credit,
        }
    }

    /// Keys from `KNOWN_KEYS` absent in the YAML text (their defaults apply).
    pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
        let yaml: Value = serde_yaml::from_str(content)?;
        let Some(map) = yaml.as_mapping() else {
            return Ok(KNOWN_KEYS.to_vec());
        };
        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join(DB_FILE),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}
