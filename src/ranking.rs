//! Display ordering for processed tokens
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::processing::ProcessedToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Legitimacy score, then volume
    Relevancy,
    /// 24h volume only
    #[default]
    Volume,
    /// Legitimacy score only
    Trust,
}

impl RankMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankMode::Relevancy => "relevancy",
            RankMode::Volume => "volume",
            RankMode::Trust => "trust",
        }
    }

    /// Parse a mode name; unknown names fall back to volume ordering
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "relevancy" => RankMode::Relevancy,
            "trust" => RankMode::Trust,
            _ => RankMode::Volume,
        }
    }
}

impl std::fmt::Display for RankMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn cmp_volume_desc(a: &ProcessedToken, b: &ProcessedToken) -> Ordering {
    b.token
        .sort_volume()
        .partial_cmp(&a.token.sort_volume())
        .unwrap_or(Ordering::Equal)
}

fn cmp_score_desc(a: &ProcessedToken, b: &ProcessedToken) -> Ordering {
    b.legitimacy_score.cmp(&a.legitimacy_score)
}

/// Order processed tokens for display
///
/// The sort is stable: records that compare equal keep their input order.
pub fn sort_tokens(mut tokens: Vec<ProcessedToken>, mode: RankMode) -> Vec<ProcessedToken> {
    match mode {
        RankMode::Relevancy => {
            tokens.sort_by(|a, b| cmp_score_desc(a, b).then_with(|| cmp_volume_desc(a, b)))
        }
        RankMode::Volume => tokens.sort_by(cmp_volume_desc),
        RankMode::Trust => tokens.sort_by(cmp_score_desc),
    }
    tokens
}
