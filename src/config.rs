//! Configuration loading and discovery for `spritegif.toml`
//!
//! Provides defaults for the conversion settings; explicit CLI arguments
//! always take precedence over config values.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the config file searched for in parent directories.
pub const CONFIG_FILE_NAME: &str = "spritegif.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse spritegif.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Root configuration for a `spritegif.toml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpritegifConfig {
    /// Default conversion settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Default settings applied when the corresponding CLI argument is omitted.
///
/// All keys are optional; absent keys fall through to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of grid rows
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<u32>,
    /// Number of grid columns
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cols: Option<u32>,
    /// Per-frame duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration: Option<u32>,
    /// GIF repeat count, 0 for infinite
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none", default)]
    pub loop_count: Option<u16>,
    /// Nearest-neighbor scale factor
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scale: Option<f32>,
    /// Whether the encoder spends extra effort shrinking the output
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub optimize: Option<bool>,
}

impl SpritegifConfig {
    /// Check config values, returning one message per invalid field.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.defaults.rows == Some(0) {
            errors.push("defaults.rows must be at least 1".to_string());
        }
        if self.defaults.cols == Some(0) {
            errors.push("defaults.cols must be at least 1".to_string());
        }
        if let Some(scale) = self.defaults.scale {
            if scale <= 0.0 || scale.is_nan() {
                errors.push("defaults.scale must be greater than 0".to_string());
            }
        }

        errors
    }
}

/// Find spritegif.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from the current directory looking for spritegif.toml
/// 2. Check `XDG_CONFIG_HOME/spritegif/spritegif.toml` (or
///    `~/.config/spritegif/spritegif.toml`)
///
/// # Returns
/// - `Some(path)` if a config file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find spritegif.toml in the XDG config directory.
fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("spritegif").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find spritegif.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a spritegif.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. A missing config file is not an error;
/// the built-in defaults apply.
///
/// # Returns
/// - `Ok(SpritegifConfig)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed, or validated
pub fn load_config(path: Option<&Path>) -> Result<SpritegifConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(SpritegifConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SpritegifConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SpritegifConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}
