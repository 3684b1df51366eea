//! Centralized argument handling for tokenscreen
//!
//! - Global CMD_ARGS storage with thread-safe access
//! - Debug flag checks for every pipeline module
//! - Value lookups for the CLI options
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value following a flag, if any
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

/// Gets a numeric flag value; unparseable values are treated as absent
pub fn get_arg_f64(flag: &str) -> Option<f64> {
    get_arg_value(flag)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

pub fn is_debug_tokens_enabled() -> bool {
    has_arg("--debug-tokens")
}

pub fn is_debug_scoring_enabled() -> bool {
    has_arg("--debug-scoring")
}

pub fn is_debug_dedup_enabled() -> bool {
    has_arg("--debug-dedup")
}

pub fn is_debug_ranking_enabled() -> bool {
    has_arg("--debug-ranking")
}

pub fn is_debug_filtering_enabled() -> bool {
    has_arg("--debug-filtering")
}

pub fn is_debug_search_enabled() -> bool {
    has_arg("--debug-search")
}

pub fn is_debug_session_enabled() -> bool {
    has_arg("--debug-session")
}

pub fn is_debug_config_enabled() -> bool {
    has_arg("--debug-config")
}

pub fn is_any_debug_enabled() -> bool {
    !get_enabled_debug_modes().is_empty()
}

/// Gets a list of all enabled debug modes
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let checks: [(&'static str, fn() -> bool); 8] = [
        ("tokens", is_debug_tokens_enabled),
        ("scoring", is_debug_scoring_enabled),
        ("dedup", is_debug_dedup_enabled),
        ("ranking", is_debug_ranking_enabled),
        ("filtering", is_debug_filtering_enabled),
        ("search", is_debug_search_enabled),
        ("session", is_debug_session_enabled),
        ("config", is_debug_config_enabled),
    ];

    checks
        .iter()
        .filter(|(_, check)| check())
        .map(|(name, _)| *name)
        .collect()
}

/// Prints enabled debug modes to stderr
pub fn print_debug_info() {
    if is_any_debug_enabled() {
        eprintln!("Enabled debug modes: {:?}", get_enabled_debug_modes());
    }
}

pub fn print_help() {
    println!(
        "tokenscreen - score, dedupe, rank and filter launchpad token listings

USAGE:
    tokenscreen --input <tokens.json> [OPTIONS]

INPUT:
    --input <path>          JSON token dump (array, or object with `tokens`/`results`)
    --config <path>         TOML configuration (default: data/config.toml)

RANKING:
    --sort <mode>           relevancy | volume | trust (default from config)
    --search <query>        Keep matching tokens, ordered by search relevancy

FILTERS:
    --preset <name>         newAndRising | whaleActivity | communityFavorite | highVolume
                            (a preset also sets the listing order, with or without --search)
    --min-volume <n>        Minimum 24h volume
    --max-volume <n>        Maximum 24h volume
    --min-holders <n>       Minimum holder count
    --max-holders <n>       Maximum holder count
    --max-age <days>        Maximum token age in days
    --min-age <days>        Minimum token age in days
    --category <name>       Only tokens in this category

OUTPUT:
    --page <n>              Page number (default 1)
    --per-page <n>          Page size (default from config)
    --lookup <address>      Show a single token by address
    --json                  Print JSON instead of a table

LOGGING:
    --debug-<module>        tokens, scoring, dedup, ranking, filtering, search, session, config
    --verbose, -v           Very detailed output
    --quiet, -q             Warnings and errors only
    --help, -h              Show this help
    --version, -V           Show version"
    );
}

// =============================================================================
// COMMON ARGUMENT PATTERNS
// =============================================================================

pub mod patterns {
    use super::*;

    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }

    pub fn is_version_requested() -> bool {
        has_arg("--version") || has_arg("-V")
    }

    pub fn is_quiet_mode() -> bool {
        has_arg("--quiet") || has_arg("-q")
    }

    pub fn is_verbose_mode() -> bool {
        has_arg("--verbose") || has_arg("-v")
    }

    pub fn is_json_output() -> bool {
        has_arg("--json")
    }

    pub fn get_input_path() -> Option<String> {
        get_arg_value("--input")
    }

    pub fn get_config_path() -> Option<String> {
        get_arg_value("--config")
    }

    pub fn get_sort_mode() -> Option<String> {
        get_arg_value("--sort")
    }

    pub fn get_preset() -> Option<String> {
        get_arg_value("--preset")
    }

    pub fn get_search_query() -> Option<String> {
        get_arg_value("--search")
    }

    pub fn get_category() -> Option<String> {
        get_arg_value("--category")
    }

    pub fn get_lookup_address() -> Option<String> {
        get_arg_value("--lookup")
    }

    pub fn get_page() -> Option<usize> {
        get_arg_value("--page").and_then(|s| s.parse().ok())
    }

    pub fn get_per_page() -> Option<usize> {
        get_arg_value("--per-page").and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CMD_ARGS is process-global; serialize the tests that replace it
    static ARGS_GUARD: Mutex<()> = Mutex::new(());

    fn with_args<F: FnOnce()>(args: &[&str], body: F) {
        let _guard = ARGS_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        set_cmd_args(args.iter().map(|s| s.to_string()).collect());
        body();
    }

    #[test]
    fn test_set_and_get_args() {
        with_args(&["tokenscreen", "--debug-scoring"], || {
            assert_eq!(
                get_cmd_args(),
                vec!["tokenscreen".to_string(), "--debug-scoring".to_string()]
            );
        });
    }

    #[test]
    fn test_get_arg_value() {
        with_args(&["tokenscreen", "--input", "tokens.json", "--sort", "--json"], || {
            assert_eq!(get_arg_value("--input"), Some("tokens.json".to_string()));
            // A following flag is not a value
            assert_eq!(get_arg_value("--sort"), None);
            assert_eq!(get_arg_value("--preset"), None);
        });
    }

    #[test]
    fn test_numeric_values() {
        with_args(&["tokenscreen", "--min-volume", "1500.5", "--max-age", "abc"], || {
            assert_eq!(get_arg_f64("--min-volume"), Some(1500.5));
            assert_eq!(get_arg_f64("--max-age"), None);
        });
    }

    #[test]
    fn test_debug_flags() {
        with_args(&["tokenscreen", "--debug-scoring", "--debug-dedup"], || {
            assert!(is_debug_scoring_enabled());
            assert!(is_debug_dedup_enabled());
            assert!(!is_debug_search_enabled());
            assert!(is_any_debug_enabled());
            assert_eq!(get_enabled_debug_modes(), vec!["scoring", "dedup"]);
        });
    }

    #[test]
    fn test_patterns() {
        with_args(
            &["tokenscreen", "-h", "--page", "3", "--per-page", "x", "--json"],
            || {
                assert!(patterns::is_help_requested());
                assert!(patterns::is_json_output());
                assert_eq!(patterns::get_page(), Some(3));
                assert_eq!(patterns::get_per_page(), None);
                assert!(!patterns::is_version_requested());
            },
        );
    }
}
