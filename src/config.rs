//! Engine configuration.
//!
//! Tuning knobs for the synchronization engine, loadable from a TOML file in
//! the platform config directory. Hosts that configure the engine in code
//! can ignore the file entirely and use `EngineConfig::default()`.

use crate::camera::PaddingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet window after the last discovery trigger, in milliseconds
    pub debounce_ms: u64,
    /// Below this zoom, discovery clears its sources and queries nothing
    pub min_discovery_zoom: f64,
    /// Polls before giving up on a missing map source
    pub source_retry_attempts: u32,
    /// Delay between source polls, in milliseconds
    pub source_retry_delay_ms: u64,
    /// Zoom used when flying to a single point
    pub default_detail_zoom: f64,
    /// Zoom cap for bounds fits
    pub fit_max_zoom: f64,
    /// Layout chrome sizes for padding computation
    pub padding: PaddingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            min_discovery_zoom: 6.0,
            source_retry_attempts: 10,
            source_retry_delay_ms: 100,
            default_detail_zoom: 12.0,
            fit_max_zoom: 13.0,
            padding: PaddingConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "providenceit", "PeakMap")
}

/// Path of the engine config file.
pub fn get_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("engine.toml"))
        .unwrap_or_else(|| PathBuf::from("engine.toml"))
}

/// Load engine configuration, falling back to defaults when no file exists.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load engine configuration from an explicit path.
pub fn load_config_from(path: &PathBuf) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save engine configuration to file.
pub fn save_config(config: &EngineConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save engine configuration to an explicit path.
pub fn save_config_to(config: &EngineConfig, path: &PathBuf) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}
