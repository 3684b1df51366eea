//! Configuration schemas - all config sections defined once with defaults
//!
//! Each struct uses `config_struct!`, so a TOML file only needs the keys
//! it wants to override.
use crate::config_struct;
use crate::errors::{ScreenerError, ScreenerResult};

// ============================================================================
// SCORING CONFIGURATION
// ============================================================================

config_struct! {
    /// Legitimacy score normalization ceilings and weights
    ///
    /// Each component is `ln(raw + 1) / ln(ceiling) * 100`, clamped to
    /// [0, 100]; the weighted sum is rounded to the final score.
    pub struct ScoringConfig {
        // Log-scale ceilings (raw value that maps to 100)
        age_ceiling_days: f64 = 365.0,
        volume_ceiling: f64 = 1_000_000.0,
        trades_ceiling: f64 = 1_000.0,
        holders_ceiling: f64 = 10_000.0,

        // Component weights (must sum to 1.0)
        age_weight: f64 = 0.3,
        volume_weight: f64 = 0.3,
        trades_weight: f64 = 0.2,
        holders_weight: f64 = 0.2,
    }
}

impl ScoringConfig {
    pub fn total_weight(&self) -> f64 {
        self.age_weight + self.volume_weight + self.trades_weight + self.holders_weight
    }

    pub fn validate(&self) -> ScreenerResult<()> {
        let ceilings = [
            ("scoring.age_ceiling_days", self.age_ceiling_days),
            ("scoring.volume_ceiling", self.volume_ceiling),
            ("scoring.trades_ceiling", self.trades_ceiling),
            ("scoring.holders_ceiling", self.holders_ceiling),
        ];
        for (field, ceiling) in ceilings {
            if !ceiling.is_finite() || ceiling <= 1.0 {
                return Err(ScreenerError::invalid_config(
                    field,
                    format!("ceiling must be a finite value greater than 1, got {}", ceiling),
                ));
            }
        }

        let weights = [
            ("scoring.age_weight", self.age_weight),
            ("scoring.volume_weight", self.volume_weight),
            ("scoring.trades_weight", self.trades_weight),
            ("scoring.holders_weight", self.holders_weight),
        ];
        for (field, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScreenerError::invalid_config(
                    field,
                    format!("weight must be non-negative, got {}", weight),
                ));
            }
        }

        let total = self.total_weight();
        if (total - 1.0).abs() > 0.001 {
            return Err(ScreenerError::invalid_config(
                "scoring",
                format!("weights must sum to 1.0, got {:.3}", total),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// RANKING CONFIGURATION
// ============================================================================

config_struct! {
    /// Display ordering defaults
    pub struct RankingConfig {
        /// relevancy | volume | trust
        default_sort: String = "volume".to_string(),
    }
}

// ============================================================================
// FILTERING CONFIGURATION
// ============================================================================

config_struct! {
    /// Filter and pagination defaults
    pub struct FilteringConfig {
        per_page: usize = 12,
        max_per_page: usize = 100,
    }
}

// ============================================================================
// SESSION CONFIGURATION
// ============================================================================

config_struct! {
    /// Trade session cache bounds
    pub struct SessionConfig {
        token_cache_ttl_secs: u64 = 300,
        token_cache_capacity: usize = 5_000,
        processed_tx_ttl_secs: u64 = 3_600,
        processed_tx_capacity: usize = 10_000,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sections
    pub struct Config {
        scoring: ScoringConfig = ScoringConfig::default(),
        ranking: RankingConfig = RankingConfig::default(),
        filtering: FilteringConfig = FilteringConfig::default(),
        session: SessionConfig = SessionConfig::default(),
    }
}

impl Config {
    pub fn validate(&self) -> ScreenerResult<()> {
        self.scoring.validate()?;

        if self.filtering.max_per_page == 0 {
            return Err(ScreenerError::invalid_config(
                "filtering.max_per_page",
                "must be at least 1",
            ));
        }
        if self.session.token_cache_capacity == 0 || self.session.processed_tx_capacity == 0 {
            return Err(ScreenerError::invalid_config(
                "session",
                "cache capacities must be at least 1",
            ));
        }

        Ok(())
    }
}
