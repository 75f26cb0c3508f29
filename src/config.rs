use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::ALL_YEARS;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RISK_ATLAS_CONFIG";

/// Config file looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "risk-atlas.json";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Dataset opened at startup.
    pub dataset_path: Option<PathBuf>,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Initial year selection.
    pub default_year: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            window_size: [1200.0, 800.0],
            default_year: ALL_YEARS.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing config")
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the startup config.
    ///
    /// `$RISK_ATLAS_CONFIG` if set, else `./risk-atlas.json` if present, else
    /// defaults. A dataset path given on the command line wins over the file.
    pub fn resolve(env_path: Option<PathBuf>, cli_dataset: Option<PathBuf>) -> Result<Self> {
        let mut config = match env_path {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if cli_dataset.is_some() {
            config.dataset_path = cli_dataset;
        }
        log::debug!("config: {config:?}");
        Ok(config)
    }
}
