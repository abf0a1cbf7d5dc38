mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{Config, SearchConfig};

use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::fs;
use std::path::PathBuf;

use crate::scoring::validate_pricing;

/// Get the config directory path (~/.config/park2go/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("park2go")
}

/// Get the default config file path (~/.config/park2go/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/park2go/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error; built-in defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate the whole config at startup, collecting every error.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match validate_pricing(&config.pricing()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    let search = config.search();
    if !search.radius_km.is_finite() || search.radius_km <= 0.0 {
        errors.push("search.radius_km: must be a positive number".to_string());
    }
    if search.limit == 0 {
        errors.push("search.limit: must be at least 1".to_string());
    }
    if utc_offset(&search).is_none() {
        errors.push(format!(
            "search.utc_offset_minutes: {} is not a valid UTC offset",
            search.utc_offset_minutes
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The configured local offset, if it is within ±24h
pub fn utc_offset(search: &SearchConfig) -> Option<FixedOffset> {
    search
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

/// Slot store path from config, or the default location
pub fn slots_path(config: &Config) -> PathBuf {
    config
        .slots_path
        .clone()
        .unwrap_or_else(crate::slots::get_slots_path)
}
