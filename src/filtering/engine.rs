use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::form_urlencoded;

use crate::config;
use crate::filtering::types::{FilterOptions, FilterSortKey, Page, SortDirection};
use crate::logger::{self, LogTag};
use crate::tokens::TokenRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterRejectionReason {
    VolumeTooLow,
    VolumeTooHigh,
    HoldersTooLow,
    HoldersTooHigh,
    TokenTooOld,
    TokenTooNew,
    TradesTooFew,
    AvgTradeTooSmall,
    MarketCapMissing,
    MarketCapTooLow,
    MarketCapTooHigh,
    PriceChangeTooLow,
    PriceChangeTooHigh,
    CategoryMismatch,
}

impl FilterRejectionReason {
    pub fn label(&self) -> &'static str {
        match self {
            FilterRejectionReason::VolumeTooLow => "volume_too_low",
            FilterRejectionReason::VolumeTooHigh => "volume_too_high",
            FilterRejectionReason::HoldersTooLow => "holders_too_low",
            FilterRejectionReason::HoldersTooHigh => "holders_too_high",
            FilterRejectionReason::TokenTooOld => "token_too_old",
            FilterRejectionReason::TokenTooNew => "token_too_new",
            FilterRejectionReason::TradesTooFew => "trades_too_few",
            FilterRejectionReason::AvgTradeTooSmall => "avg_trade_too_small",
            FilterRejectionReason::MarketCapMissing => "market_cap_missing",
            FilterRejectionReason::MarketCapTooLow => "market_cap_too_low",
            FilterRejectionReason::MarketCapTooHigh => "market_cap_too_high",
            FilterRejectionReason::PriceChangeTooLow => "price_change_too_low",
            FilterRejectionReason::PriceChangeTooHigh => "price_change_too_high",
            FilterRejectionReason::CategoryMismatch => "category_mismatch",
        }
    }
}

fn holders_of(token: &TokenRecord) -> f64 {
    if token.holders.is_nan() {
        0.0
    } else {
        token.holders
    }
}

fn price_change_of(token: &TokenRecord) -> f64 {
    token.price_change_24h.unwrap_or(0.0)
}

/// Check one record against every active bound
///
/// Records without `created_at` pass both age bounds. Records without a
/// market cap fail any market cap bound that is set.
pub fn evaluate(
    token: &TokenRecord,
    options: &FilterOptions,
    now: DateTime<Utc>,
) -> Result<(), FilterRejectionReason> {
    let volume = token.sort_volume();
    let holders = holders_of(token);

    if options.min_volume > 0.0 && volume < options.min_volume {
        return Err(FilterRejectionReason::VolumeTooLow);
    }
    if options.max_volume < f64::INFINITY && volume > options.max_volume {
        return Err(FilterRejectionReason::VolumeTooHigh);
    }
    if options.min_holders > 0.0 && holders < options.min_holders {
        return Err(FilterRejectionReason::HoldersTooLow);
    }
    if options.max_holders < f64::INFINITY && holders > options.max_holders {
        return Err(FilterRejectionReason::HoldersTooHigh);
    }

    if let Some(age) = token.age_in_days(now) {
        if let Some(max_age) = options.max_age_days.filter(|max| *max > 0.0) {
            if age > max_age {
                return Err(FilterRejectionReason::TokenTooOld);
            }
        }
        if let Some(min_age) = options.min_age_days.filter(|min| *min > 0.0) {
            if age < min_age {
                return Err(FilterRejectionReason::TokenTooNew);
            }
        }
    }

    if options.min_trades > 0.0 && !(token.trades_24h >= options.min_trades) {
        return Err(FilterRejectionReason::TradesTooFew);
    }
    if options.min_avg_trade_size > 0.0 && !(token.avg_trade_size() >= options.min_avg_trade_size) {
        return Err(FilterRejectionReason::AvgTradeTooSmall);
    }

    if options.min_market_cap.is_some() || options.max_market_cap.is_some() {
        let market_cap = token
            .market_cap
            .filter(|cap| !cap.is_nan())
            .ok_or(FilterRejectionReason::MarketCapMissing)?;
        if let Some(min) = options.min_market_cap {
            if market_cap < min {
                return Err(FilterRejectionReason::MarketCapTooLow);
            }
        }
        if let Some(max) = options.max_market_cap {
            if market_cap > max {
                return Err(FilterRejectionReason::MarketCapTooHigh);
            }
        }
    }

    let change = price_change_of(token);
    if let Some(min) = options.min_price_change_24h {
        if !(change >= min) {
            return Err(FilterRejectionReason::PriceChangeTooLow);
        }
    }
    if let Some(max) = options.max_price_change_24h {
        if !(change <= max) {
            return Err(FilterRejectionReason::PriceChangeTooHigh);
        }
    }

    if let Some(category) = options.category.as_deref() {
        let matches = token
            .category
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case(category))
            .unwrap_or(false);
        if !matches {
            return Err(FilterRejectionReason::CategoryMismatch);
        }
    }

    Ok(())
}

#[derive(Default)]
struct FilteringStats {
    passed: usize,
    rejected: usize,
    rejection_counts: HashMap<FilterRejectionReason, usize>,
}

impl FilteringStats {
    fn record_rejection(&mut self, reason: FilterRejectionReason) {
        self.rejected += 1;
        self.rejection_counts
            .entry(reason)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn rejection_summary(&self) -> String {
        if self.rejection_counts.is_empty() {
            return "-".to_string();
        }

        let mut parts: Vec<(FilterRejectionReason, usize)> = self
            .rejection_counts
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        parts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(b.0.label())));

        parts
            .iter()
            .take(5)
            .map(|(reason, count)| format!("{}:{}", reason.label(), count))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Keep the records that satisfy every active bound, preserving order
pub fn filter_tokens<T>(items: &[T], options: &FilterOptions, now: DateTime<Utc>) -> Vec<T>
where
    T: AsRef<TokenRecord> + Clone,
{
    let mut stats = FilteringStats::default();
    let mut kept = Vec::new();

    for item in items {
        match evaluate(item.as_ref(), options, now) {
            Ok(()) => {
                stats.passed += 1;
                kept.push(item.clone());
            }
            Err(reason) => {
                if logger::is_debug_enabled(&LogTag::Filtering) {
                    logger::debug(
                        LogTag::Filtering,
                        &format!("address={} rejected={}", item.as_ref().address, reason.label()),
                    );
                }
                stats.record_rejection(reason);
            }
        }
    }

    logger::debug(
        LogTag::Filtering,
        &format!(
            "passed={} rejected={} reasons={}",
            stats.passed,
            stats.rejected,
            stats.rejection_summary()
        ),
    );

    kept
}

fn sort_value(token: &TokenRecord, key: FilterSortKey) -> f64 {
    let value = match key {
        FilterSortKey::Volume => token.volume_24h,
        FilterSortKey::Holders => token.holders,
        FilterSortKey::Trades => token.trades_24h,
        FilterSortKey::MarketCap => token.market_cap.unwrap_or(0.0),
        FilterSortKey::PriceChange24h => price_change_of(token),
        FilterSortKey::Unsorted => 0.0,
    };
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Stable sort of a filtered listing by one metric
pub fn sort_filtered<T: AsRef<TokenRecord>>(
    items: &mut [T],
    sort_by: FilterSortKey,
    sort_dir: SortDirection,
) {
    let ascending = matches!(sort_dir, SortDirection::Asc);
    items.sort_by(|a, b| {
        let lhs = sort_value(a.as_ref(), sort_by);
        let rhs = sort_value(b.as_ref(), sort_by);
        let ordering = lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Slice a listing into a page, clamping the page size to `max_per_page`
///
/// Page 0 is treated as page 1 and pages past the end resolve to the last
/// page.
pub fn paginate_with_limit<T>(
    items: Vec<T>,
    page: usize,
    per_page: usize,
    max_per_page: usize,
) -> Page<T> {
    let page_size = per_page.max(1).min(max_per_page.max(1));
    let total = items.len();
    let total_pages = if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    };

    let normalized_page = if total_pages == 0 {
        1
    } else {
        page.max(1).min(total_pages)
    };

    let start_idx = normalized_page
        .saturating_sub(1)
        .saturating_mul(page_size);

    let items: Vec<T> = items.into_iter().skip(start_idx).take(page_size).collect();

    Page {
        items,
        page: normalized_page,
        page_size,
        total,
        total_pages,
    }
}

/// Slice a listing into a page using the configured maximum page size
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let max_per_page = config::with_config(|cfg| cfg.filtering.max_per_page);
    paginate_with_limit(items, page, per_page, max_per_page)
}

// =============================================================================
// QUERY STRING ROUND TRIP
// =============================================================================

impl FilterOptions {
    /// Encode as a URL query string
    ///
    /// Bounds at their defaults are omitted; ordering and pagination are
    /// always present.
    pub fn to_query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());

        if self.min_volume > 0.0 {
            params.append_pair("minVolume", &self.min_volume.to_string());
        }
        if self.max_volume < f64::INFINITY {
            params.append_pair("maxVolume", &self.max_volume.to_string());
        }
        if self.min_holders > 0.0 {
            params.append_pair("minHolders", &self.min_holders.to_string());
        }
        if self.max_holders < f64::INFINITY {
            params.append_pair("maxHolders", &self.max_holders.to_string());
        }
        if self.min_avg_trade_size > 0.0 {
            params.append_pair("minTransactionSize", &self.min_avg_trade_size.to_string());
        }
        if self.min_trades > 0.0 {
            params.append_pair("minTrades", &self.min_trades.to_string());
        }
        let optional_bounds = [
            ("minAge", self.min_age_days),
            ("maxAge", self.max_age_days),
            ("minMarketCap", self.min_market_cap),
            ("maxMarketCap", self.max_market_cap),
            ("minPriceChange24h", self.min_price_change_24h),
            ("maxPriceChange24h", self.max_price_change_24h),
        ];
        for (key, value) in optional_bounds {
            if let Some(value) = value {
                params.append_pair(key, &value.to_string());
            }
        }

        params.append_pair("sortBy", self.sort_by.as_str());
        params.append_pair("sortDir", self.sort_dir.as_str());
        if let Some(category) = &self.category {
            params.append_pair("category", category);
        }
        params.append_pair("page", &self.page.to_string());
        params.append_pair("perPage", &self.per_page.to_string());

        params.finish()
    }

    /// Parse options from a URL query string (leading `?` optional)
    ///
    /// Unknown keys and unparseable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        let query = query.trim_start_matches('?');

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let number = value.trim().parse::<f64>().ok().filter(|v| !v.is_nan());
            match key.as_ref() {
                "minVolume" => set_if_some(&mut options.min_volume, number),
                "maxVolume" => set_if_some(&mut options.max_volume, number),
                "minHolders" => set_if_some(&mut options.min_holders, number),
                "maxHolders" => set_if_some(&mut options.max_holders, number),
                "minTransactionSize" => set_if_some(&mut options.min_avg_trade_size, number),
                "minTrades" => set_if_some(&mut options.min_trades, number),
                "minAge" => options.min_age_days = number.or(options.min_age_days),
                "maxAge" => options.max_age_days = number.or(options.max_age_days),
                "minMarketCap" => options.min_market_cap = number.or(options.min_market_cap),
                "maxMarketCap" => options.max_market_cap = number.or(options.max_market_cap),
                "minPriceChange24h" => {
                    options.min_price_change_24h = number.or(options.min_price_change_24h)
                }
                "maxPriceChange24h" => {
                    options.max_price_change_24h = number.or(options.max_price_change_24h)
                }
                "sortBy" => options.sort_by = FilterSortKey::from_str(&value),
                "sortDir" => options.sort_dir = SortDirection::from_str(&value),
                "category" if !value.is_empty() => options.category = Some(value.into_owned()),
                "page" => set_if_some(&mut options.page, value.trim().parse().ok()),
                "perPage" => set_if_some(&mut options.per_page, value.trim().parse().ok()),
                _ => {}
            }
        }

        options.with_page_bounds()
    }
}

fn set_if_some<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
