//! Configuration utilities - loading and access helpers
//!
//! - Loading configuration from a TOML file (defaults when absent)
//! - Thread-safe access helpers
use super::schemas::Config;
use crate::errors::{ConfigurationError, ScreenerError, ScreenerResult};
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Read and validate a configuration file without touching the global state
///
/// A missing file yields the defaults; an unreadable, malformed or invalid
/// file is an error.
pub fn read_config_file(path: &str) -> ScreenerResult<Config> {
    if !Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScreenerError::Configuration(ConfigurationError::FileUnreadable {
            path: path.to_string(),
            error: e.to_string(),
        })
    })?;

    let config = toml::from_str::<Config>(&contents).map_err(|e| {
        ScreenerError::Configuration(ConfigurationError::ParseFailed {
            path: path.to_string(),
            error: e.to_string(),
        })
    })?;

    config.validate()?;

    logger::debug(
        LogTag::Config,
        &format!("Loaded config from '{}': {:?}", path, config),
    );

    Ok(config)
}

pub fn load_config() -> ScreenerResult<()> {
    load_config_from_path(CONFIG_FILE_PATH)
}

/// Load configuration from a specific file path into the global CONFIG
pub fn load_config_from_path(path: &str) -> ScreenerResult<()> {
    let config = read_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| ScreenerError::Configuration(ConfigurationError::AlreadyInitialized))
}

/// Execute a function with read access to the configuration
///
/// Falls back to the built-in defaults when no file was loaded, so library
/// callers can use the pipeline without any setup.
///
/// # Example
/// ```
/// use tokenscreen::config::with_config;
///
/// let per_page = with_config(|cfg| cfg.filtering.per_page);
/// assert!(per_page > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => f(&*lock.read()),
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}
