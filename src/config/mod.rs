//! Configuration system
//!
//! Sections are declared with `config_struct!` in `schemas`, loaded from
//! TOML by `utils`, and read anywhere through `with_config`.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, FilteringConfig, RankingConfig, ScoringConfig, SessionConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path, read_config_file, with_config, CONFIG,
    CONFIG_FILE_PATH,
};
