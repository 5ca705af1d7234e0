use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::SnowHandling;
use crate::pipeline::PipelineOptions;
use crate::provider::{geocoding, open_meteo};

/// Top-level configuration stored on disk.
///
/// Base URLs are configurable so tests (and self-hosted deployments) can
/// point the clients somewhere else; everything defaults to the public
/// providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timezone sent with every forecast request, e.g. "Asia/Tokyo".
    pub timezone: String,

    pub geocoding_base_url: String,
    pub forecast_base_url: String,

    /// Whether WMO snow codes get their own category or fold into rainy.
    pub snow_handling: SnowHandling,

    /// When false, reports carry current conditions only.
    pub include_daily: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tokyo".to_string(),
            geocoding_base_url: geocoding::DEFAULT_BASE_URL.to_string(),
            forecast_base_url: open_meteo::DEFAULT_BASE_URL.to_string(),
            snow_handling: SnowHandling::default(),
            include_daily: true,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The subset of the config the pipeline itself cares about.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            snow_handling: self.snow_handling,
            include_daily: self.include_daily,
        }
    }
}
