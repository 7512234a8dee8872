// File: src/config.rs
use crate::core::stats::DEFAULT_PROBABILITY;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_DUMP_PATH: &str = "npt_output.txt";

/// Storage section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Export target for the save operation, also imported at startup.
    pub dump_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
    pub load_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            dump_path: PathBuf::from(DEFAULT_DUMP_PATH),
            snapshot_path: None,
            load_on_start: true,
        }
    }
}

/// Statistics section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub initial_probability: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        StatisticsConfig { initial_probability: DEFAULT_PROBABILITY }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
