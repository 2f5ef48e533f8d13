//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! checked-in reference file can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    board: BoardDefaults,
    mcts: MctsDefaults,
    territory: TerritoryDefaults,
    actor: ActorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct BoardDefaults {
    size: usize,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    c_puct: f64,
    temperature: f64,
    dirichlet_alpha: f64,
    dirichlet_weight: f64,
}

#[derive(Debug, Deserialize)]
struct TerritoryDefaults {
    k: f64,
    b: f64,
}

#[derive(Debug, Deserialize)]
struct ActorDefaults {
    games: u32,
    blue: String,
    green: String,
    seed: u64,
    log_interval: u32,
}

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Board
pub fn board_size() -> usize {
    DEFAULTS.board.size
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn temperature() -> f64 {
    DEFAULTS.mcts.temperature
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_weight() -> f64 {
    DEFAULTS.mcts.dirichlet_weight
}

// Territory
pub fn territory_k() -> f64 {
    DEFAULTS.territory.k
}
pub fn territory_b() -> f64 {
    DEFAULTS.territory.b
}

// Actor
pub fn games() -> u32 {
    DEFAULTS.actor.games
}
pub fn blue() -> &'static str {
    &DEFAULTS.actor.blue
}
pub fn green() -> &'static str {
    &DEFAULTS.actor.green
}
pub fn seed() -> u64 {
    DEFAULTS.actor.seed
}
pub fn log_interval() -> u32 {
    DEFAULTS.actor.log_interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        assert_eq!(data_dir(), "./data");
        assert_eq!(log_level(), "info");
        assert_eq!(board_size(), 7);
    }

    #[test]
    fn test_mcts_defaults() {
        assert_eq!(num_simulations(), 1000);
        assert!((c_puct() - 4.0).abs() < f64::EPSILON);
        assert_eq!(dirichlet_alpha(), 0.0);
        assert!((dirichlet_weight() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_territory_defaults() {
        assert!((territory_k() - 2.0).abs() < f64::EPSILON);
        assert!((territory_b() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_actor_defaults() {
        assert_eq!(games(), 10);
        assert_eq!(blue(), "mcts-territory");
        assert_eq!(green(), "greedy");
        assert_eq!(log_interval(), 1);
    }
}
