use crate::core::roster::{DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, RosterSettings};
use crate::errors::{AppError, AppResult};
use crate::logging::DEFAULT_FILTER;
use crate::models::Operator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = ".vattend";
const CONFIG_FILE: &str = "vattend.conf";
const DATABASE_FILE: &str = "vattend.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub operator_id: i64,
    #[serde(default = "default_operator_name")]
    pub operator_name: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_operator_name() -> String {
    "cli".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_batch_delay_ms() -> u64 {
    DEFAULT_BATCH_DELAY.as_millis() as u64
}
fn default_log_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            operator_id: 0,
            operator_name: default_operator_name(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Per-user configuration directory (`~/.vattend`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DATABASE_FILE)
    }

    /// Load the configuration file, or defaults when it does not exist.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::ConfigSave(e.to_string()))?;
        fs::write(path, yaml).map_err(|e| AppError::ConfigSave(format!("{}: {}", path.display(), e)))
    }

    /// Resolve a database name against the config directory.
    pub fn resolve_database(name: &str) -> PathBuf {
        let p = Path::new(name);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Create the config directory and file. In test mode the config file is
    /// left untouched and only the returned value carries the database path.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let db_path = match custom_db {
            Some(name) if is_test => PathBuf::from(name),
            Some(name) => Self::resolve_database(name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Self::default()
        };

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            config.save_to(&Self::config_file())?;
        }
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }

    pub fn roster_settings(&self) -> RosterSettings {
        RosterSettings::new(self.batch_size, Duration::from_millis(self.batch_delay_ms))
    }

    pub fn operator(&self) -> Operator {
        Operator::new(self.operator_id, self.operator_name.clone())
    }
}
