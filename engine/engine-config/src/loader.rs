//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SIEGE_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the SIEGE_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, etc.). Unparseable values are ignored.
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={:?}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: SIEGE_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "SIEGE_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "SIEGE_COMMON_LOG_LEVEL");

    // Board
    env_override!(config, board.size, "SIEGE_BOARD_SIZE", parse);

    // MCTS
    env_override!(
        config,
        mcts.num_simulations,
        "SIEGE_MCTS_NUM_SIMULATIONS",
        parse
    );
    env_override!(config, mcts.c_puct, "SIEGE_MCTS_C_PUCT", parse);
    env_override!(config, mcts.temperature, "SIEGE_MCTS_TEMPERATURE", parse);
    env_override!(
        config,
        mcts.dirichlet_alpha,
        "SIEGE_MCTS_DIRICHLET_ALPHA",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_weight,
        "SIEGE_MCTS_DIRICHLET_WEIGHT",
        parse
    );

    // Territory
    env_override!(config, territory.k, "SIEGE_TERRITORY_K", parse);
    env_override!(config, territory.b, "SIEGE_TERRITORY_B", parse);

    // Actor
    env_override!(config, actor.games, "SIEGE_ACTOR_GAMES", parse);
    env_override!(config, actor.blue, "SIEGE_ACTOR_BLUE");
    env_override!(config, actor.green, "SIEGE_ACTOR_GREEN");
    env_override!(config, actor.seed, "SIEGE_ACTOR_SEED", parse);
    env_override!(
        config,
        actor.log_interval,
        "SIEGE_ACTOR_LOG_INTERVAL",
        parse
    );

    config
}
