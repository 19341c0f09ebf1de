use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process table refresh interval.
    pub tick_rate_ms: u64,
    /// JSON settings file; the file is rewritten here after every run.
    pub settings_path: PathBuf,
    pub syslog_path: PathBuf,
    pub log_path: PathBuf,
    /// Upper bound for every external command the panel runs.
    pub command_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 2000,
            settings_path: PathBuf::from("resources/settings.json"),
            syslog_path: PathBuf::from("/var/log/messages"),
            log_path: PathBuf::from("sysview.log"),
            command_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn exists() -> bool {
        std::path::Path::new(CONFIG_PATH).exists()
    }

    pub fn load() -> Result<Self> {
        let content = std::fs::read_to_string(CONFIG_PATH)
            .context("Failed to read config.toml")?;
        toml::from_str(&content).context("Failed to parse config.toml")
    }
}
