use std::path::{Path, PathBuf};

use crate::schema::EntitySchema;
use crate::{AppError, AppResult};

pub const APP_IDENTIFIER: &str = "com.keepsake.app";
pub const DATA_DIR_ENV: &str = "KEEPSAKE_DATA_DIR";
pub const LOG_FILTER_ENV: &str = "KEEPSAKE_LOG";
pub const LOG_DIR_ENV: &str = "KEEPSAKE_LOG_DIR";
pub const DEFAULT_LOG_FILTER: &str = "keepsake=info,sqlx=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding one database file per screen.
    pub data_dir: PathBuf,
    pub log_filter: String,
    /// When set, JSON log lines are also written to `keepsake.log` here.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to the platform data
    /// directory when no data dir is configured.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = match non_empty(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|base| base.join(APP_IDENTIFIER))
                .ok_or_else(|| {
                    AppError::new(
                        "CONFIG/NO_DATA_DIR",
                        "Could not determine a data directory; set KEEPSAKE_DATA_DIR.",
                    )
                })?,
        };

        Ok(Self {
            data_dir,
            log_filter: non_empty(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
            log_dir: non_empty(LOG_DIR_ENV).map(PathBuf::from),
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn db_path(&self, schema: &EntitySchema) -> PathBuf {
        self.data_dir.join(schema.db_file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
