//! Token processing pipeline
//!
//! Normalized records go through duplicate grouping, legitimacy scoring
//! and display ranking. Every input record yields exactly one output
//! record; scoring failures degrade the record instead of failing the call.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Config, ScoringConfig};
use crate::dedup::{annotate_duplicates, DuplicateInfo};
use crate::logger::{self, LogTag};
use crate::ranking::{sort_tokens, RankMode};
use crate::scoring::{score_token, LegitimacyOutcome};
use crate::tokens::TokenRecord;

/// Token record annotated with legitimacy and duplicate information
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedToken {
    #[serde(flatten)]
    pub token: TokenRecord,
    pub legitimacy: LegitimacyOutcome,
    pub legitimacy_score: u8,
    pub legitimacy_details: String,
    pub has_duplicates: bool,
    pub is_original: bool,
    pub duplicate_count: usize,
}

impl ProcessedToken {
    pub fn new(token: TokenRecord, legitimacy: LegitimacyOutcome, duplicates: DuplicateInfo) -> Self {
        Self {
            token,
            legitimacy_score: legitimacy.score(),
            legitimacy_details: legitimacy.details(),
            legitimacy,
            has_duplicates: duplicates.has_duplicates,
            is_original: duplicates.is_original,
            duplicate_count: duplicates.duplicate_count,
        }
    }
}

impl AsRef<TokenRecord> for ProcessedToken {
    fn as_ref(&self) -> &TokenRecord {
        &self.token
    }
}

/// Options for a processing run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessOptions {
    pub sort_by: RankMode,
    pub scoring: ScoringConfig,
}

impl ProcessOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sort_by: RankMode::from_str(&config.ranking.default_sort),
            scoring: config.scoring.clone(),
        }
    }

    pub fn with_sort(mut self, sort_by: RankMode) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Score, annotate duplicates and rank a batch of tokens at instant `now`
pub fn process_tokens(
    tokens: &[TokenRecord],
    options: &ProcessOptions,
    now: DateTime<Utc>,
) -> Vec<ProcessedToken> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let duplicates = annotate_duplicates(tokens);

    let processed: Vec<ProcessedToken> = tokens
        .iter()
        .zip(duplicates)
        .map(|(token, duplicate_info)| {
            let outcome = score_token(token, &options.scoring, now);
            ProcessedToken::new(token.clone(), outcome, duplicate_info)
        })
        .collect();

    let degraded = processed.iter().filter(|t| t.legitimacy.is_degraded()).count();
    let copies = processed
        .iter()
        .filter(|t| t.has_duplicates && !t.is_original)
        .count();
    logger::debug(
        LogTag::Ranking,
        &format!(
            "Processed {} tokens ({} duplicate copies, {} degraded scores), sorting by {}",
            processed.len(),
            copies,
            degraded,
            options.sort_by
        ),
    );

    sort_tokens(processed, options.sort_by)
}

/// Process tokens against the current wall-clock time
pub fn process_tokens_now(tokens: &[TokenRecord], options: &ProcessOptions) -> Vec<ProcessedToken> {
    process_tokens(tokens, options, Utc::now())
}
