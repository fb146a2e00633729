//! Runtime settings read from the environment (and `.env`, loaded in `main`).

use super::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use std::{env, path::PathBuf, time::Duration};

/// Default directory for replace-import backups.
pub const DEFAULT_BACKUP_DIR: &str = "data/backups";
/// Default directory for exports.
pub const DEFAULT_EXPORT_DIR: &str = "data/exports";
/// Default seed file.
pub const DEFAULT_SEED_FILE: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `SQLite` connection string
    pub database_url: String,
    /// Where replace imports write their backup
    pub backup_dir: PathBuf,
    /// Where exports are written unless a directory is given
    pub export_dir: PathBuf,
    /// Periodic re-query cadence for subscriptions; off when `None`
    pub refresh_interval: Option<Duration>,
    /// TOML file holding the sample data seeded into an empty store
    pub seed_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            refresh_interval: None,
            seed_file: PathBuf::from(DEFAULT_SEED_FILE),
        }
    }
}

impl AppConfig {
    /// Builds the settings from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when `REFRESH_INTERVAL_MS` is not a whole
    /// number of milliseconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let refresh_interval = match lookup("REFRESH_INTERVAL_MS") {
            Some(raw) => parse_refresh_interval(&raw)?,
            None => None,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            backup_dir: lookup("BACKUP_DIR").map_or(defaults.backup_dir, PathBuf::from),
            export_dir: lookup("EXPORT_DIR").map_or(defaults.export_dir, PathBuf::from),
            refresh_interval,
            seed_file: lookup("SEED_FILE").map_or(defaults.seed_file, PathBuf::from),
        })
    }
}

/// Zero or an empty value turns periodic refresh off.
fn parse_refresh_interval(raw: &str) -> Result<Option<Duration>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let millis: u64 = raw.parse().map_err(|e| Error::Config {
        message: format!("REFRESH_INTERVAL_MS must be a number of milliseconds: {e}"),
    })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}
