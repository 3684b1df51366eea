//! Token listing filters, presets and pagination
//!
//! Filtering works on anything that exposes a [`TokenRecord`], so raw
//! records and processed tokens share the same engine.
//!
//! [`TokenRecord`]: crate::tokens::TokenRecord

pub mod engine;
pub mod types;

pub use engine::{
    evaluate, filter_tokens, paginate, paginate_with_limit, sort_filtered, FilterRejectionReason,
};
pub use types::{FilterOptions, FilterPreset, FilterSortKey, Page, SortDirection, DEFAULT_PER_PAGE};
