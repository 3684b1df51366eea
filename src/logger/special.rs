//! Special logging functions for specific use cases

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::scoring::{LegitimacyOutcome, ScoreBreakdown};

/// Log a token's legitimacy breakdown on one line
///
/// Shows the per-metric component scores next to the raw inputs so
/// surprising scores can be traced back to their inputs. Only emitted when
/// scoring debug output is enabled.
pub fn log_score_breakdown(address: &str, symbol: &str, breakdown: &ScoreBreakdown) {
    let message = format!(
        "{} ({}) score={} age={:.1}d/{:.1} volume={:.2}/{:.1} trades={:.0}/{:.1} holders={:.0}/{:.1}",
        symbol,
        address,
        breakdown.legitimacy_score,
        breakdown.age_in_days,
        breakdown.age_score,
        breakdown.volume,
        breakdown.volume_score,
        breakdown.trades,
        breakdown.trades_score,
        breakdown.holders,
        breakdown.holders_score,
    );
    super::core::log_internal(LogTag::Scoring, LogLevel::Debug, &message);
}

/// Log a degraded scoring outcome
pub fn log_degraded_score(address: &str, name: Option<&str>, outcome: &LegitimacyOutcome) {
    if let LegitimacyOutcome::Degraded(reason) = outcome {
        super::core::log_internal(
            LogTag::Scoring,
            LogLevel::Warning,
            &format!(
                "Error processing token {} ({}): {}",
                name.unwrap_or("undefined"),
                address,
                reason
            ),
        );
    }
}
