use serde::Serialize;

use crate::config::FilteringConfig;

/// Default page size when no configuration is supplied
pub const DEFAULT_PER_PAGE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterSortKey {
    Volume,
    Holders,
    Trades,
    MarketCap,
    PriceChange24h,
    /// Unrecognized key; every record sorts as 0
    Unsorted,
}

impl FilterSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterSortKey::Volume => "volume",
            FilterSortKey::Holders => "holders",
            FilterSortKey::Trades => "trades",
            FilterSortKey::MarketCap => "marketCap",
            FilterSortKey::PriceChange24h => "priceChange24h",
            FilterSortKey::Unsorted => "none",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "volume" => FilterSortKey::Volume,
            "holders" => FilterSortKey::Holders,
            "trades" => FilterSortKey::Trades,
            "marketCap" => FilterSortKey::MarketCap,
            "priceChange24h" => FilterSortKey::PriceChange24h,
            _ => FilterSortKey::Unsorted,
        }
    }
}

/// Named filter bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPreset {
    NewAndRising,
    WhaleActivity,
    CommunityFavorite,
    HighVolume,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 4] = [
        FilterPreset::NewAndRising,
        FilterPreset::WhaleActivity,
        FilterPreset::CommunityFavorite,
        FilterPreset::HighVolume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPreset::NewAndRising => "newAndRising",
            FilterPreset::WhaleActivity => "whaleActivity",
            FilterPreset::CommunityFavorite => "communityFavorite",
            FilterPreset::HighVolume => "highVolume",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.as_str() == value)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterPreset::NewAndRising => "New & Rising",
            FilterPreset::WhaleActivity => "Whale Activity",
            FilterPreset::CommunityFavorite => "Community Favorite",
            FilterPreset::HighVolume => "High Volume",
        }
    }
}

/// Filter, ordering and pagination options for a token listing
///
/// Bounds left at their defaults (0 for minimums, infinity for maximums,
/// `None` for optional bounds) are not applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub min_volume: f64,
    pub max_volume: f64,
    pub min_holders: f64,
    pub max_holders: f64,
    /// Values <= 0 disable the bound
    pub max_age_days: Option<f64>,
    pub min_age_days: Option<f64>,
    pub min_trades: f64,
    /// Minimum average trade size (volume / trades)
    pub min_avg_trade_size: f64,
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
    pub min_price_change_24h: Option<f64>,
    pub max_price_change_24h: Option<f64>,
    pub category: Option<String>,
    pub sort_by: FilterSortKey,
    pub sort_dir: SortDirection,
    pub page: usize,
    pub per_page: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_volume: 0.0,
            max_volume: f64::INFINITY,
            min_holders: 0.0,
            max_holders: f64::INFINITY,
            max_age_days: None,
            min_age_days: None,
            min_trades: 0.0,
            min_avg_trade_size: 0.0,
            min_market_cap: None,
            max_market_cap: None,
            min_price_change_24h: None,
            max_price_change_24h: None,
            category: None,
            sort_by: FilterSortKey::Volume,
            sort_dir: SortDirection::Desc,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterOptions {
    pub fn from_config(config: &FilteringConfig) -> Self {
        Self {
            per_page: config.per_page,
            ..Self::default()
        }
    }

    /// Overlay a preset's thresholds and ordering; other fields are kept
    /// and the page resets to 1.
    pub fn with_preset(mut self, preset: FilterPreset) -> Self {
        match preset {
            FilterPreset::NewAndRising => {
                self.max_age_days = Some(7.0);
                self.min_volume = 1_000.0;
                self.min_holders = 100.0;
                self.sort_by = FilterSortKey::Volume;
            }
            FilterPreset::WhaleActivity => {
                self.min_volume = 100_000.0;
                self.min_avg_trade_size = 10_000.0;
                self.sort_by = FilterSortKey::Volume;
            }
            FilterPreset::CommunityFavorite => {
                self.min_holders = 1_000.0;
                self.min_age_days = Some(30.0);
                self.sort_by = FilterSortKey::Holders;
            }
            FilterPreset::HighVolume => {
                self.min_volume = 500_000.0;
                self.min_trades = 1_000.0;
                self.sort_by = FilterSortKey::Volume;
            }
        }
        self.sort_dir = SortDirection::Desc;
        self.page = 1;
        self
    }

    pub fn with_page_bounds(mut self) -> Self {
        if self.page == 0 {
            self.page = 1;
        }
        if self.per_page == 0 {
            self.per_page = DEFAULT_PER_PAGE;
        }
        self
    }

    pub fn clamp_per_page(&mut self, max_per_page: usize) {
        let max_size = max_per_page.max(1);
        self.per_page = self.per_page.max(1).min(max_size);
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_names() {
        for key in [
            FilterSortKey::Volume,
            FilterSortKey::Holders,
            FilterSortKey::Trades,
            FilterSortKey::MarketCap,
            FilterSortKey::PriceChange24h,
        ] {
            assert_eq!(FilterSortKey::from_str(key.as_str()), key);
        }
        assert_eq!(FilterSortKey::from_str("fdv"), FilterSortKey::Unsorted);
        assert_eq!(SortDirection::from_str("sideways"), SortDirection::Desc);
    }

    #[test]
    fn test_presets() {
        let options = FilterOptions::default().with_preset(FilterPreset::NewAndRising);
        assert_eq!(options.max_age_days, Some(7.0));
        assert_eq!(options.min_volume, 1_000.0);
        assert_eq!(options.min_holders, 100.0);
        assert_eq!(options.sort_by, FilterSortKey::Volume);
        assert_eq!(options.sort_dir, SortDirection::Desc);

        let whale = FilterOptions::default().with_preset(FilterPreset::WhaleActivity);
        assert_eq!(whale.min_volume, 100_000.0);
        assert_eq!(whale.min_avg_trade_size, 10_000.0);

        let community = FilterOptions::default().with_preset(FilterPreset::CommunityFavorite);
        assert_eq!(community.min_holders, 1_000.0);
        assert_eq!(community.min_age_days, Some(30.0));
        assert_eq!(community.sort_by, FilterSortKey::Holders);

        let high = FilterOptions::default().with_preset(FilterPreset::HighVolume);
        assert_eq!(high.min_volume, 500_000.0);
        assert_eq!(high.min_trades, 1_000.0);

        assert_eq!(FilterPreset::from_str("highVolume"), Some(FilterPreset::HighVolume));
        assert_eq!(FilterPreset::from_str("HighVolume"), None);
    }

    #[test]
    fn test_preset_keeps_unrelated_fields() {
        let options = FilterOptions {
            category: Some("meme".to_string()),
            page: 4,
            ..FilterOptions::default()
        }
        .with_preset(FilterPreset::HighVolume);
        assert_eq!(options.category.as_deref(), Some("meme"));
        assert_eq!(options.page, 1);
    }

    #[test]
    fn test_page_bounds() {
        let mut options = FilterOptions {
            page: 0,
            per_page: 0,
            ..FilterOptions::default()
        }
        .with_page_bounds();
        assert_eq!(options.page, 1);
        assert_eq!(options.per_page, DEFAULT_PER_PAGE);

        options.per_page = 500;
        options.clamp_per_page(100);
        assert_eq!(options.per_page, 100);
    }
}
