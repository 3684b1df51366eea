//! Logger configuration derived from command-line flags
//!
//! Holds the minimum level threshold plus the per-tag debug/verbose sets.
//! Stored globally so every module logs through the same rules.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    /// Tags with `--debug-<key>` enabled
    pub debug_tags: HashSet<String>,
    /// Tags with `--verbose-<key>` enabled
    pub verbose_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build a logger configuration from an argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" || arg == "-v" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" || arg == "-q" {
            if config.min_level != LogLevel::Verbose {
                config.min_level = LogLevel::Warning;
            }
        } else if let Some(key) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(key.to_string());
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(key) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(key.to_string());
            config.min_level = LogLevel::Verbose;
        }
    }

    config
}

/// Scan the global argument vector and install the resulting configuration
pub fn init_from_args() {
    let args = get_cmd_args();
    set_logger_config(config_from_args(&args));
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = LOGGER_CONFIG.read();
    let key = tag.to_debug_key();
    config.debug_tags.contains(&key) || config.verbose_tags.contains(&key)
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().verbose_tags.contains(&tag.to_debug_key())
}
