//! Core types for token records flowing through the pipeline
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

// ============================================================================
// TOKEN RECORD - Canonical shape after API normalization
// ============================================================================

/// Canonical token record
///
/// Every upstream schema variant is mapped onto this shape by
/// `tokens::api`, so pipeline code never branches on field names.
/// Numeric metrics are already coerced: missing or unparseable values are 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Chain-specific token address (display/trading identity)
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub volume_24h: f64,
    pub trades_24h: f64,
    /// Holder count, resolved from total_accounts / holder_count / holders
    pub holders: f64,
    pub market_cap: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub category: Option<String>,
    /// Upstream fields the pipeline does not interpret, passed through untouched
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TokenRecord {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            symbol: None,
            created_at: None,
            volume_24h: 0.0,
            trades_24h: 0.0,
            holders: 0.0,
            market_cap: None,
            price_change_24h: None,
            category: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_identity(mut self, name: &str, symbol: &str) -> Self {
        self.name = Some(name.to_string());
        self.symbol = Some(symbol.to_string());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_metrics(mut self, volume_24h: f64, trades_24h: f64, holders: f64) -> Self {
        self.volume_24h = volume_24h;
        self.trades_24h = trades_24h;
        self.holders = holders;
        self
    }

    /// Age in fractional days relative to `now`, if the creation time is known
    ///
    /// May be negative when `created_at` lies in the future.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> Option<f64> {
        self.created_at
            .map(|created| (now - created).num_milliseconds() as f64 / MILLIS_PER_DAY)
    }

    /// Average trade size over the last 24h (0 when there were no trades)
    pub fn avg_trade_size(&self) -> f64 {
        if self.trades_24h > 0.0 {
            self.volume_24h / self.trades_24h
        } else {
            0.0
        }
    }

    /// Volume used for ordering; NaN sorts as 0
    pub fn sort_volume(&self) -> f64 {
        if self.volume_24h.is_nan() {
            0.0
        } else {
            self.volume_24h
        }
    }

    pub fn display_symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or("?")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

impl AsRef<TokenRecord> for TokenRecord {
    fn as_ref(&self) -> &TokenRecord {
        self
    }
}
