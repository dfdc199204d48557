pub mod init;
mod schema;
mod validation;

pub use schema::{Config, SimulatorConfig, DEFAULT_CHART_ROWS, DEFAULT_MAX_ROWS};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODEL_FILE_NAME: &str = "f1_champion_predictor.json";

/// Get the config directory path (~/.config/f1-predictor/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("f1-predictor")
}

/// Get the default config file path (~/.config/f1-predictor/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Get the default model artifact path (~/.config/f1-predictor/f1_champion_predictor.json)
pub fn get_default_model_path() -> PathBuf {
    get_config_dir().join(MODEL_FILE_NAME)
}

/// Pick the model path: command-line override, then config, then default.
pub fn resolve_model_path(override_path: Option<PathBuf>, config: &Config) -> PathBuf {
    override_path
        .or_else(|| config.model_path.clone())
        .unwrap_or_else(get_default_model_path)
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/f1-predictor/config.yaml) and falls back to defaults when that
///   file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => {
            let path = get_config_path();
            if path.exists() {
                read_config(&path)
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
