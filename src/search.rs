//! Free-text token search with relevancy tiers
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ScoringConfig;
use crate::logger::{self, LogTag};
use crate::processing::{process_tokens, ProcessOptions, ProcessedToken};
use crate::ranking::RankMode;
use crate::tokens::TokenRecord;

const EXACT_SYMBOL: f64 = 100.0;
const EXACT_NAME: f64 = 90.0;

/// Exclusive tiers, checked in order; only the first match counts
const TIERS: [(MatchField, MatchKind, f64); 7] = [
    (MatchField::Address, MatchKind::Exact, 80.0),
    (MatchField::Symbol, MatchKind::Prefix, 70.0),
    (MatchField::Name, MatchKind::Prefix, 60.0),
    (MatchField::Address, MatchKind::Prefix, 50.0),
    (MatchField::Symbol, MatchKind::Contains, 40.0),
    (MatchField::Name, MatchKind::Contains, 30.0),
    (MatchField::Address, MatchKind::Contains, 20.0),
];

/// Relevancy multiplier for copies that are not the group original
const DUPLICATE_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
enum MatchField {
    Symbol,
    Name,
    Address,
}

#[derive(Debug, Clone, Copy)]
enum MatchKind {
    Exact,
    Prefix,
    Contains,
}

struct SearchFields {
    symbol: String,
    name: String,
    address: String,
}

impl SearchFields {
    fn of(token: &TokenRecord) -> Self {
        Self {
            symbol: token.symbol.as_deref().unwrap_or("").to_lowercase(),
            name: token.name.as_deref().unwrap_or("").to_lowercase(),
            address: token.address.to_lowercase(),
        }
    }

    fn get(&self, field: MatchField) -> &str {
        match field {
            MatchField::Symbol => &self.symbol,
            MatchField::Name => &self.name,
            MatchField::Address => &self.address,
        }
    }

    fn contains(&self, query: &str) -> bool {
        self.name.contains(query) || self.symbol.contains(query) || self.address.contains(query)
    }
}

fn field_matches(value: &str, query: &str, kind: MatchKind) -> bool {
    match kind {
        MatchKind::Exact => value == query,
        MatchKind::Prefix => value.starts_with(query),
        MatchKind::Contains => value.contains(query),
    }
}

/// Processed token with its relevancy for the current query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub processed: ProcessedToken,
    pub search_relevancy: f64,
}

impl AsRef<TokenRecord> for SearchResult {
    fn as_ref(&self) -> &TokenRecord {
        &self.processed.token
    }
}

fn relevancy_for(fields: &SearchFields, processed: &ProcessedToken, query: &str) -> f64 {
    let mut score = 0.0;

    if fields.symbol == query {
        score += EXACT_SYMBOL;
    }
    if fields.name == query {
        score += EXACT_NAME;
    }
    if let Some((_, _, bonus)) = TIERS
        .iter()
        .find(|(field, kind, _)| field_matches(fields.get(*field), query, *kind))
    {
        score += bonus;
    }

    if processed.has_duplicates && !processed.is_original {
        score *= DUPLICATE_PENALTY;
    }

    score
}

/// Relevancy of one processed token for a query (case-insensitive)
pub fn search_relevancy(processed: &ProcessedToken, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    relevancy_for(&SearchFields::of(&processed.token), processed, &query)
}

fn cmp_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.search_relevancy
        .partial_cmp(&a.search_relevancy)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.processed
                .token
                .sort_volume()
                .partial_cmp(&a.processed.token.sort_volume())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.processed.legitimacy_score.cmp(&a.processed.legitimacy_score))
}

/// Search tokens by name, symbol or address
///
/// An empty query returns every token in relevancy ranking with a search
/// relevancy of 0. Otherwise only tokens whose lowercase name, symbol or
/// address contains the query are kept, ordered by search relevancy, then
/// volume, then legitimacy score.
pub fn search_tokens(
    tokens: &[TokenRecord],
    query: &str,
    scoring: &ScoringConfig,
    now: DateTime<Utc>,
) -> Vec<SearchResult> {
    let options = ProcessOptions {
        sort_by: RankMode::Relevancy,
        scoring: scoring.clone(),
    };
    let processed = process_tokens(tokens, &options, now);

    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return processed
            .into_iter()
            .map(|processed| SearchResult {
                processed,
                search_relevancy: 0.0,
            })
            .collect();
    }

    let mut results: Vec<SearchResult> = processed
        .into_iter()
        .filter_map(|processed| {
            let fields = SearchFields::of(&processed.token);
            if !fields.contains(&query) {
                return None;
            }
            let search_relevancy = relevancy_for(&fields, &processed, &query);
            Some(SearchResult {
                processed,
                search_relevancy,
            })
        })
        .collect();

    results.sort_by(cmp_results);

    logger::debug(
        LogTag::Search,
        &format!(
            "query='{}' matched {} of {} tokens",
            query,
            results.len(),
            tokens.len()
        ),
    );

    results
}
