//! Batch configuration, loadable from a JSON file.
//!
//! Every field has a default, so a file only needs the keys it changes:
//!
//! ```json
//! {
//!   "data_dir": "/srv/amedas",
//!   "days": 7,
//!   "provider": { "gap_fill": "linear" },
//!   "model": { "morning_wind_guard": "morning_hours_only" }
//! }
//! ```

use crate::model::config::{ModelConfig, RuleTableError};
use crate::weather_data::cleanup::ProviderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Invalid config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Invalid model rules in config file '{0}'")]
    Rules(PathBuf, #[source] RuleTableError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Root holding one directory of monthly files per station.
    pub data_dir: PathBuf,
    /// Where `{YYYY-MM-DD}.csv` result files are written.
    pub result_dir: PathBuf,
    /// Number of days to assess, counting back from the run date.
    pub days: u32,
    /// Stations evaluated at the same time.
    pub concurrency: usize,
    pub provider: ProviderOptions,
    pub model: ModelConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            result_dir: PathBuf::from("result"),
            days: 31,
            concurrency: 8,
            provider: ProviderOptions::default(),
            model: ModelConfig::default(),
        }
    }
}

impl BatchConfig {
    pub async fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: BatchConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config
            .model
            .rules
            .validate()
            .map_err(|e| ConfigError::Rules(path.to_path_buf(), e))?;
        Ok(config)
    }
}
