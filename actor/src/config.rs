//! Configuration for the match runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_siege::{TerritoryFn, MAX_BOARD_LEN, MIN_BOARD_LEN};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_blue() -> String {
    CENTRAL_CONFIG.actor.blue.clone()
}

fn default_green() -> String {
    CENTRAL_CONFIG.actor.green.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.actor.games
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.actor.seed
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.actor.log_interval
}

fn default_board_size() -> usize {
    CENTRAL_CONFIG.board.size
}

fn default_num_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_c_puct() -> f64 {
    CENTRAL_CONFIG.mcts.c_puct
}

fn default_temperature() -> f64 {
    CENTRAL_CONFIG.mcts.temperature
}

fn default_dirichlet_alpha() -> f64 {
    CENTRAL_CONFIG.mcts.dirichlet_alpha
}

fn default_dirichlet_weight() -> f64 {
    CENTRAL_CONFIG.mcts.dirichlet_weight
}

fn default_territory_k() -> f64 {
    CENTRAL_CONFIG.territory.k
}

fn default_territory_b() -> f64 {
    CENTRAL_CONFIG.territory.b
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "actor")]
#[command(about = "Siege match runner")]
#[command(
    long_about = "Plays a series of Siege games between two agents, alternating who
moves first, and appends every finished game to <data-dir>/games.jsonl.

Agents: random, quickest, greedy, greedy-sigmoid, mcts-rollout, mcts-territory, mcts-learned.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Agent that moves first in even-numbered games
    #[arg(long, default_value_t = default_blue())]
    pub blue: String,

    /// Agent that moves first in odd-numbered games
    #[arg(long, default_value_t = default_green())]
    pub green: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Board side length (2-8)
    #[arg(long, default_value_t = default_board_size())]
    pub board_size: usize,

    /// Base RNG seed; each agent derives its own stream from it
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Number of MCTS simulations per move
    #[arg(long, default_value_t = default_num_simulations())]
    pub num_simulations: u32,

    /// PUCT exploration constant
    #[arg(long, default_value_t = default_c_puct())]
    pub c_puct: f64,

    /// Move selection temperature (0 = most visited)
    #[arg(long, default_value_t = default_temperature())]
    pub temperature: f64,

    /// Root Dirichlet noise alpha (0 disables noise)
    #[arg(long, default_value_t = default_dirichlet_alpha())]
    pub dirichlet_alpha: f64,

    /// Fraction of each root prior replaced by noise
    #[arg(long, default_value_t = default_dirichlet_weight())]
    pub dirichlet_weight: f64,

    /// Territory sigmoid slope
    #[arg(long, default_value_t = default_territory_k())]
    pub territory_k: f64,

    /// Territory sigmoid offset
    #[arg(long, default_value_t = default_territory_b())]
    pub territory_b: f64,

    /// Data directory for game records and stats
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Log the running tally every N games (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Do not write game records
    #[arg(long)]
    pub no_record: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.blue.trim().is_empty() {
            return Err(anyhow!("blue agent cannot be empty"));
        }

        if self.green.trim().is_empty() {
            return Err(anyhow!("green agent cannot be empty"));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if !(MIN_BOARD_LEN..=MAX_BOARD_LEN).contains(&self.board_size) {
            return Err(anyhow!(
                "board_size must be between {} and {}, got {}",
                MIN_BOARD_LEN,
                MAX_BOARD_LEN,
                self.board_size
            ));
        }

        if self.num_simulations == 0 {
            return Err(anyhow!("num_simulations must be greater than 0"));
        }

        if self.c_puct <= 0.0 {
            return Err(anyhow!("c_puct must be positive, got {}", self.c_puct));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        // Remaining search settings (temperature, noise) are checked by the engine
        self.mcts_config()
            .validate()
            .map_err(|e| anyhow!("invalid search settings: {}", e))?;

        Ok(())
    }

    /// Search settings shared by every MCTS agent.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_simulations(self.num_simulations)
            .with_c_puct(self.c_puct as f32)
            .with_temperature(self.temperature as f32)
            .with_dirichlet(self.dirichlet_alpha as f32, self.dirichlet_weight as f32)
    }

    pub fn territory_fn(&self) -> TerritoryFn {
        TerritoryFn::sigmoid(self.territory_k as f32, self.territory_b as f32)
    }

    /// Path of the JSON-lines game log
    pub fn games_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("games.jsonl")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn base_config() -> Config {
        Config {
            blue: "random".into(),
            green: "greedy".into(),
            games: 2,
            board_size: 4,
            seed: 7,
            num_simulations: 50,
            c_puct: 4.0,
            temperature: 0.0,
            dirichlet_alpha: 0.0,
            dirichlet_weight: 0.25,
            territory_k: 2.0,
            territory_b: 2.0,
            data_dir: "../data".into(),
            log_level: "info".into(),
            log_interval: 1,
            no_record: false,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_agent() {
        let mut cfg = base_config();
        cfg.blue.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("blue"));

        let mut cfg = base_config();
        cfg.green = "  ".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("green"));
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn validate_rejects_board_size_out_of_range() {
        for size in [0, 1, 9, 12] {
            let mut cfg = base_config();
            cfg.board_size = size;
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("board_size"));
        }
    }

    #[test]
    fn validate_rejects_zero_simulations() {
        let mut cfg = base_config();
        cfg.num_simulations = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("num_simulations"));
    }

    #[test]
    fn validate_rejects_non_positive_c_puct() {
        let mut cfg = base_config();
        cfg.c_puct = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("c_puct"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_rejects_negative_temperature() {
        let mut cfg = base_config();
        cfg.temperature = -1.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn mcts_config_carries_cli_values() {
        let mut cfg = base_config();
        cfg.num_simulations = 321;
        cfg.c_puct = 2.5;
        cfg.dirichlet_alpha = 0.3;
        let mcts = cfg.mcts_config();
        assert_eq!(mcts.num_simulations, 321);
        assert!((mcts.c_puct - 2.5).abs() < 1e-6);
        assert!((mcts.dirichlet_alpha - 0.3).abs() < 1e-6);
        assert!((mcts.dirichlet_epsilon - 0.25).abs() < 1e-6);
    }

    #[test]
    fn territory_fn_uses_sigmoid_parameters() {
        let mut cfg = base_config();
        cfg.territory_k = 1.5;
        cfg.territory_b = 0.5;
        assert_eq!(cfg.territory_fn(), TerritoryFn::Sigmoid { k: 1.5, b: 0.5 });
    }

    #[test]
    fn games_path_constructs_correctly() {
        let cfg = base_config();
        assert_eq!(cfg.games_path(), PathBuf::from("../data/games.jsonl"));
    }
}
