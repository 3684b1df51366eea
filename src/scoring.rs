//! Legitimacy scoring
//!
//! Produces a 0-100 heuristic from token age, 24h volume, 24h trade count
//! and holder count. Each metric is log-normalized against a ceiling:
//!
//! ```text
//! component = clamp(ln(raw + 1) / ln(ceiling) * 100, 0, 100)
//! score     = round(sum(component * weight))
//! ```
//!
//! Metrics that are not numbers count as 0. Scoring a single token can
//! still fail (no creation time, metrics below -1);
//! [`score_token`] turns such failures into [`LegitimacyOutcome::Degraded`]
//! so callers always get exactly one outcome per token.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ScoringConfig;
use crate::logger::{self, LogTag};
use crate::tokens::TokenRecord;

/// Explanation attached to tokens whose score could not be computed
pub const DEGRADED_DETAILS: &str = "Error calculating legitimacy score";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("missing creation timestamp")]
    MissingCreatedAt,
    #[error("{metric} component is not a number (raw value {raw})")]
    NonFinite { metric: &'static str, raw: f64 },
}

/// Per-metric inputs and component scores behind a legitimacy score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub legitimacy_score: u8,
    pub age_in_days: f64,
    pub volume: f64,
    pub trades: f64,
    pub holders: f64,
    pub age_score: f64,
    pub volume_score: f64,
    pub trades_score: f64,
    pub holders_score: f64,
}

/// Result of scoring one token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LegitimacyOutcome {
    Scored(u8),
    Degraded(String),
}

impl LegitimacyOutcome {
    /// Score to display; degraded outcomes count as 0
    pub fn score(&self) -> u8 {
        match self {
            LegitimacyOutcome::Scored(score) => *score,
            LegitimacyOutcome::Degraded(_) => 0,
        }
    }

    pub fn details(&self) -> String {
        match self {
            LegitimacyOutcome::Scored(score) => format!(
                "Legitimacy Score: {}% (based on age, volume, trades, and holders)",
                score
            ),
            LegitimacyOutcome::Degraded(_) => DEGRADED_DETAILS.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LegitimacyOutcome::Degraded(_))
    }
}

/// Log-normalize a raw metric against its ceiling, clamped to [0, 100]
///
/// Returns NaN only when `raw` is below -1 (the logarithm is undefined).
pub fn normalize_component(raw: f64, ceiling: f64) -> f64 {
    let value = (raw + 1.0).ln() / ceiling.ln() * 100.0;
    if value.is_nan() {
        return value;
    }
    value.clamp(0.0, 100.0)
}

fn component(metric: &'static str, raw: f64, ceiling: f64) -> Result<f64, ScoreError> {
    let value = normalize_component(raw, ceiling);
    if value.is_nan() {
        return Err(ScoreError::NonFinite { metric, raw });
    }
    Ok(value)
}

fn metric_or_zero(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw
    }
}

/// Compute the full score breakdown for one token at instant `now`
///
/// A creation time in the future counts as age 0. NaN metrics count as 0.
pub fn calculate_scores(
    token: &TokenRecord,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoreBreakdown, ScoreError> {
    let age_in_days = token
        .age_in_days(now)
        .ok_or(ScoreError::MissingCreatedAt)?
        .max(0.0);

    let volume = metric_or_zero(token.volume_24h);
    let trades = metric_or_zero(token.trades_24h);
    let holders = metric_or_zero(token.holders);

    let age_score = component("age", age_in_days, config.age_ceiling_days)?;
    let volume_score = component("volume", volume, config.volume_ceiling)?;
    let trades_score = component("trades", trades, config.trades_ceiling)?;
    let holders_score = component("holders", holders, config.holders_ceiling)?;

    let weighted = age_score * config.age_weight
        + volume_score * config.volume_weight
        + trades_score * config.trades_weight
        + holders_score * config.holders_weight;

    Ok(ScoreBreakdown {
        legitimacy_score: weighted.round().clamp(0.0, 100.0) as u8,
        age_in_days,
        volume,
        trades,
        holders,
        age_score,
        volume_score,
        trades_score,
        holders_score,
    })
}

/// Score a token, converting failures into a degraded outcome
pub fn score_token(
    token: &TokenRecord,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> LegitimacyOutcome {
    match calculate_scores(token, config, now) {
        Ok(breakdown) => {
            if logger::is_debug_enabled(&LogTag::Scoring) {
                logger::log_score_breakdown(&token.address, token.display_symbol(), &breakdown);
            }
            LegitimacyOutcome::Scored(breakdown.legitimacy_score)
        }
        Err(e) => {
            let outcome = LegitimacyOutcome::Degraded(e.to_string());
            logger::log_degraded_score(&token.address, token.name.as_deref(), &outcome);
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn token(age_days: i64, volume: f64, trades: f64, holders: f64) -> TokenRecord {
        TokenRecord::new("addr")
            .with_identity("Foo", "FOO")
            .with_created_at(now() - Duration::days(age_days))
            .with_metrics(volume, trades, holders)
    }

    #[test]
    fn test_component_normalization() {
        assert_eq!(normalize_component(0.0, 365.0), 0.0);
        assert!((normalize_component(999_999.0, 1_000_000.0) - 100.0).abs() < 1e-9);
        assert_eq!(normalize_component(5_000_000.0, 1_000_000.0), 100.0);
        assert_eq!(normalize_component(f64::INFINITY, 1_000.0), 100.0);
        assert_eq!(normalize_component(-1.0, 1_000.0), 0.0);
        assert!(normalize_component(-5.0, 1_000.0).is_nan());
    }

    #[test]
    fn test_saturated_token_scores_100() {
        let config = ScoringConfig::default();
        let breakdown =
            calculate_scores(&token(400, 2_000_000.0, 5_000.0, 20_000.0), &config, now()).unwrap();
        assert_eq!(breakdown.legitimacy_score, 100);
    }

    #[test]
    fn test_fresh_empty_token_scores_0() {
        let config = ScoringConfig::default();
        let breakdown = calculate_scores(&token(0, 0.0, 0.0, 0.0), &config, now()).unwrap();
        assert_eq!(breakdown.legitimacy_score, 0);
    }

    #[test]
    fn test_weighted_combination() {
        // Volume saturated only: 100 * 0.3 = 30
        let config = ScoringConfig::default();
        let breakdown =
            calculate_scores(&token(0, 1_000_000.0, 0.0, 0.0), &config, now()).unwrap();
        assert_eq!(breakdown.legitimacy_score, 30);

        // Trades at ceiling - 1 and holders at ceiling - 1: 100*0.2 + 100*0.2 = 40
        let breakdown = calculate_scores(&token(0, 0.0, 999.0, 9_999.0), &config, now()).unwrap();
        assert_eq!(breakdown.legitimacy_score, 40);
    }

    #[test]
    fn test_partial_age_component() {
        // ln(31) / ln(365) * 100 = 58.204...; weighted 0.3 -> 17.46 -> 17
        let config = ScoringConfig::default();
        let breakdown = calculate_scores(&token(30, 0.0, 0.0, 0.0), &config, now()).unwrap();
        assert!((breakdown.age_score - 58.204).abs() < 0.001);
        assert_eq!(breakdown.legitimacy_score, 17);
    }

    #[test]
    fn test_future_creation_counts_as_new() {
        let config = ScoringConfig::default();
        let breakdown = calculate_scores(&token(-10, 0.0, 0.0, 0.0), &config, now()).unwrap();
        assert_eq!(breakdown.age_in_days, 0.0);
        assert_eq!(breakdown.legitimacy_score, 0);
    }

    #[test]
    fn test_missing_created_at_degrades() {
        let config = ScoringConfig::default();
        let record = TokenRecord::new("addr").with_metrics(1_000.0, 10.0, 10.0);

        assert_eq!(
            calculate_scores(&record, &config, now()),
            Err(ScoreError::MissingCreatedAt)
        );

        let outcome = score_token(&record, &config, now());
        assert!(outcome.is_degraded());
        assert_eq!(outcome.score(), 0);
        assert_eq!(outcome.details(), DEGRADED_DETAILS);
    }

    #[test]
    fn test_corrupt_metric_degrades() {
        let config = ScoringConfig::default();
        let outcome = score_token(&token(10, -50.0, 0.0, 0.0), &config, now());
        assert_eq!(
            outcome,
            LegitimacyOutcome::Degraded(
                "volume component is not a number (raw value -50)".to_string()
            )
        );
    }

    #[test]
    fn test_nan_metric_counts_as_zero() {
        let config = ScoringConfig::default();
        let record = token(400, f64::NAN, 999.0, 9_999.0);

        let breakdown = calculate_scores(&record, &config, now()).unwrap();
        assert_eq!(breakdown.volume, 0.0);
        assert_eq!(breakdown.volume_score, 0.0);
        // Age, trades and holders saturated: 30 + 20 + 20
        assert_eq!(breakdown.legitimacy_score, 70);

        assert_eq!(score_token(&record, &config, now()), LegitimacyOutcome::Scored(70));
    }

    #[test]
    fn test_scored_details_text() {
        assert_eq!(
            LegitimacyOutcome::Scored(42).details(),
            "Legitimacy Score: 42% (based on age, volume, trades, and holders)"
        );
    }

    #[test]
    fn test_custom_weights() {
        let config = ScoringConfig {
            age_weight: 0.0,
            volume_weight: 1.0,
            trades_weight: 0.0,
            holders_weight: 0.0,
            ..Default::default()
        };
        let breakdown = calculate_scores(&token(400, 999.0, 0.0, 0.0), &config, now()).unwrap();
        // ln(1000) / ln(1e6) = 0.5
        assert_eq!(breakdown.legitimacy_score, 50);
    }
}
