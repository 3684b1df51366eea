//! tokenscreen - legitimacy scoring, copycat detection, ranking and
//! filtering for launchpad token listings.
//!
//! The pipeline is: normalize upstream JSON ([`tokens`]), group copycats
//! ([`dedup`]), score ([`scoring`]), rank ([`ranking`]), then optionally
//! filter ([`filtering`]) or search ([`search`]). [`processing`] ties the
//! first four together.

pub mod arguments;
pub mod config;
pub mod dedup;
pub mod display;
pub mod errors;
pub mod filtering;
pub mod logger;
pub mod processing;
pub mod ranking;
pub mod scoring;
pub mod search;
pub mod session;
pub mod tokens;
