//! Environment-backed configuration

use std::path::PathBuf;

/// Development default for the remote task API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

const DEFAULT_DATA_DIR: &str = ".taskdeck";

/// Runtime configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote task API
    pub api_base_url: String,
    /// Directory holding locally persisted state
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment, falling back to local
    /// development defaults.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("TASKDECK_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let data_dir = std::env::var("TASKDECK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            api_base_url,
            data_dir,
        }
    }

    /// Path of the task cache file inside the data directory.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }
}
