//! Structured logging for tokenscreen
//!
//! - Standard levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output on stderr
//!
//! ## Usage
//!
//! ```rust
//! use tokenscreen::logger::{self, LogTag};
//!
//! logger::info(LogTag::Tokens, "Loaded 120 tokens");
//! logger::debug(LogTag::Scoring, "score details ..."); // Only with --debug-scoring
//! logger::verbose(LogTag::Dedup, "group members ..."); // Only with --verbose
//! ```
//!
//! Call [`init`] once at startup, after arguments are available.

mod config;
mod core;
mod format;
mod levels;
mod special;
mod tags;

pub use config::{config_from_args, get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use special::{log_degraded_score, log_score_breakdown};
pub use tags::LogTag;

/// Initialize the logger from command-line flags
pub fn init() {
    config::init_from_args();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the `--debug-<module>` flag matching the tag is present.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level
///
/// Only shown with `--verbose` or `--verbose-<module>`.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Whether debug output for a tag is currently enabled
///
/// Lets callers skip building expensive debug strings.
pub fn is_debug_enabled(tag: &LogTag) -> bool {
    core::should_log(tag, LogLevel::Debug)
}
