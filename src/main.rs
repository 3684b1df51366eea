use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use tokenscreen::{
    arguments::{get_arg_f64, patterns, print_debug_info, print_help},
    config::{self, Config, CONFIG_FILE_PATH},
    display::{listing_table, page_summary, print_stdout_safe, ListingRow},
    filtering::{filter_tokens, paginate, sort_filtered, FilterOptions, FilterPreset},
    logger::{self, LogTag},
    processing::{process_tokens, ProcessOptions},
    ranking::RankMode,
    scoring::LegitimacyOutcome,
    search::search_tokens,
    session::TradeSession,
    tokens::{load_tokens_from_path, TokenRecord},
};

/// Entry point for the tokenscreen CLI
///
/// Loads a token dump, scores and ranks it, then prints one page of the
/// (optionally filtered or searched) listing as a table or JSON.
fn main() {
    logger::init();

    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    if patterns::is_version_requested() {
        println!("tokenscreen {}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    print_debug_info();

    if let Err(e) = run() {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = load_configuration()?;

    let input = patterns::get_input_path().context("missing --input <path> (see --help)")?;
    let tokens = load_tokens_from_path(&input)
        .with_context(|| format!("failed to load tokens from '{}'", input))?;

    let now = Utc::now();
    let session = TradeSession::new(&config.session);
    session.remember_tokens(&tokens);

    if let Some(address) = patterns::get_lookup_address() {
        return print_lookup(&session, &tokens, &address, &config, now);
    }

    let options = build_filter_options(&config)?;
    let preset_active = patterns::get_preset().is_some();

    if let Some(query) = patterns::get_search_query() {
        let results = search_tokens(&tokens, &query, &config.scoring, now);
        let mut filtered = filter_tokens(&results, &options, now);
        if preset_active {
            sort_filtered(&mut filtered, options.sort_by, options.sort_dir);
        }
        return print_listing(filtered, &options);
    }

    let sort_by = patterns::get_sort_mode()
        .map(|mode| RankMode::from_str(&mode))
        .unwrap_or_else(|| RankMode::from_str(&config.ranking.default_sort));
    let process_options = ProcessOptions::from_config(&config).with_sort(sort_by);

    let processed = process_tokens(&tokens, &process_options, now);
    let mut filtered = filter_tokens(&processed, &options, now);
    if preset_active {
        sort_filtered(&mut filtered, options.sort_by, options.sort_dir);
    }

    print_listing(filtered, &options)
}

fn load_configuration() -> Result<Config> {
    match patterns::get_config_path() {
        Some(path) => {
            if !Path::new(&path).exists() {
                bail!("config file '{}' does not exist", path);
            }
            config::load_config_from_path(&path)
                .with_context(|| format!("failed to load config from '{}'", path))?;
        }
        None => {
            if Path::new(CONFIG_FILE_PATH).exists() {
                config::load_config().context("failed to load default config")?;
            }
        }
    }

    let config = config::get_config_clone();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_filter_options(config: &Config) -> Result<FilterOptions> {
    let mut options = FilterOptions::from_config(&config.filtering);

    if let Some(name) = patterns::get_preset() {
        let preset = FilterPreset::from_str(&name).with_context(|| {
            let known: Vec<&str> = FilterPreset::ALL.iter().map(|p| p.as_str()).collect();
            format!("unknown preset '{}' (expected one of: {})", name, known.join(", "))
        })?;
        logger::info(
            LogTag::Filtering,
            &format!("Applying preset {}", preset.display_name()),
        );
        options = options.with_preset(preset);
    }

    if let Some(v) = get_arg_f64("--min-volume") {
        options.min_volume = v;
    }
    if let Some(v) = get_arg_f64("--max-volume") {
        options.max_volume = v;
    }
    if let Some(v) = get_arg_f64("--min-holders") {
        options.min_holders = v;
    }
    if let Some(v) = get_arg_f64("--max-holders") {
        options.max_holders = v;
    }
    if let Some(v) = get_arg_f64("--max-age") {
        options.max_age_days = Some(v);
    }
    if let Some(v) = get_arg_f64("--min-age") {
        options.min_age_days = Some(v);
    }
    if let Some(category) = patterns::get_category() {
        options.category = Some(category);
    }
    if let Some(page) = patterns::get_page() {
        options.page = page;
    }
    if let Some(per_page) = patterns::get_per_page() {
        options.per_page = per_page;
    }

    let mut options = options.with_page_bounds();
    options.clamp_per_page(config.filtering.max_per_page);

    logger::debug(
        LogTag::Filtering,
        &format!("Filter query: {}", options.to_query_string()),
    );

    Ok(options)
}

fn print_listing<T>(items: Vec<T>, options: &FilterOptions) -> Result<()>
where
    T: ListingRow + Serialize,
{
    let page = paginate(items, options.page, options.per_page);

    if patterns::is_json_output() {
        let json = serde_json::to_string_pretty(&page).context("failed to serialize page")?;
        print_stdout_safe(&json);
        return Ok(());
    }

    if page.items.is_empty() {
        print_stdout_safe("No tokens match the current filters.");
    } else {
        print_stdout_safe(&listing_table(&page.items).to_string());
    }
    print_stdout_safe(&page_summary(&page));
    Ok(())
}

fn print_lookup(
    session: &TradeSession,
    tokens: &[TokenRecord],
    address: &str,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    if session.lookup_token(address).is_none() {
        bail!("token '{}' not found in input", address);
    }

    // Scores and duplicate flags depend on the whole batch
    let processed = process_tokens(tokens, &ProcessOptions::from_config(config), now);
    let token = processed
        .into_iter()
        .find(|t| t.token.address == address)
        .with_context(|| format!("token '{}' missing from processed batch", address))?;

    if patterns::is_json_output() {
        let json = serde_json::to_string_pretty(&token).context("failed to serialize token")?;
        print_stdout_safe(&json);
    } else {
        print_stdout_safe(&listing_table(std::slice::from_ref(&token)).to_string());
        print_stdout_safe(&token.legitimacy_details);
        if let Some(reason) = degraded_reason(&token) {
            print_stdout_safe(&format!("Scoring failed: {}", reason));
        }
    }
    Ok(())
}

fn degraded_reason<T: ListingRow>(row: &T) -> Option<&str> {
    match &row.processed().legitimacy {
        LegitimacyOutcome::Degraded(reason) => Some(reason.as_str()),
        LegitimacyOutcome::Scored(_) => None,
    }
}
