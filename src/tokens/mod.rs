//! Token records and backend payload normalization

pub mod api;
pub mod types;

pub use api::{
    lenient_f64, load_tokens_from_path, normalize_tokens, parse_float_prefix, parse_timestamp,
    parse_tokens_json, ApiToken,
};
pub use types::TokenRecord;
