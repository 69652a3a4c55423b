// src/config.rs

//! Configuration loading utilities.
//!
//! Non-secret settings come from `config.toml`; mail credentials come from
//! the environment, optionally seeded from a `.env` file.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::EmailCredentials;

/// Load `.env` into the process environment if present.
pub fn load_env() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No .env file found"),
        Err(e) => log::warn!("Failed to load .env: {}", e),
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults when the file does not exist; a file that exists
/// but does not parse is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::warn!("No config at {}. Using default configuration.", path.display());
        return Ok(Config::default());
    }

    Config::load(path).map_err(|e| {
        AppError::config(format!("Failed to load config from {}: {e}", path.display()))
    })
}

/// Load and validate the configuration plus mail credentials.
pub fn load_all(config_path: &Path) -> Result<(Config, EmailCredentials)> {
    load_env();

    let config = load_config(config_path)?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;

    Ok((config, EmailCredentials::from_env()))
}
