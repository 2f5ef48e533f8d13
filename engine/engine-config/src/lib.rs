//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the Siege binaries.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`SIEGE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! SIEGE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     SIEGE_COMMON_DATA_DIR=/data
//!     SIEGE_BOARD_SIZE=5
//!     SIEGE_MCTS_NUM_SIMULATIONS=400
//!     SIEGE_ACTOR_BLUE=mcts-rollout
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
