//! Backend settings, read from an optional `dinoduty.yaml`.
//!
//! ```yaml
//! data_directory: /home/me/.local/share/DinoDuty
//! log_filter: dinoduty_backend=debug,info
//! ```
//!
//! Missing keys fall back to [`BackendConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "dinoduty.yaml";
pub const APP_DIRECTORY_NAME: &str = "DinoDuty";
pub const DEFAULT_LOG_FILTER: &str = "dinoduty_backend=debug,info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Where the key-value documents live
    pub data_directory: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading backend config from {:?}", path);

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: BackendConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml_content = serde_yaml::to_string(self)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        info!("Saved backend config to {:?}", path);
        Ok(())
    }
}

/// `<platform data dir>/DinoDuty`, or a temp directory when the platform has none
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIRECTORY_NAME)
}
