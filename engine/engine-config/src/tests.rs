//! Tests for the configuration module.

use super::*;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.board.size, 7);
    assert_eq!(config.mcts.num_simulations, 1000);
    assert_eq!(config.actor.games, 10);
    assert_eq!(config.actor.seed, 42);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert!((config.mcts.c_puct - 4.0).abs() < f64::EPSILON);
    assert_eq!(config.mcts.temperature, 0.0);
    assert_eq!(config.mcts.dirichlet_alpha, 0.0);
    assert!((config.mcts.dirichlet_weight - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_siege_env_overrides() {
    std::env::set_var("SIEGE_COMMON_DATA_DIR", "/tmp/siege-data");
    std::env::set_var("SIEGE_ACTOR_GAMES", "7");
    std::env::set_var("SIEGE_TERRITORY_K", "0.5");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.common.data_dir, "/tmp/siege-data");
    assert_eq!(config.actor.games, 7);
    assert!((config.territory.k - 0.5).abs() < f64::EPSILON);

    std::env::remove_var("SIEGE_COMMON_DATA_DIR");
    std::env::remove_var("SIEGE_ACTOR_GAMES");
    std::env::remove_var("SIEGE_TERRITORY_K");
}

#[test]
fn test_unparseable_override_ignored() {
    std::env::set_var("SIEGE_MCTS_NUM_SIMULATIONS", "lots");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.num_simulations, 1000);

    std::env::remove_var("SIEGE_MCTS_NUM_SIMULATIONS");
}

#[test]
fn test_agent_env_overrides() {
    std::env::set_var("SIEGE_ACTOR_BLUE", "random");
    std::env::set_var("SIEGE_ACTOR_GREEN", "mcts-rollout");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.actor.blue, "random");
    assert_eq!(config.actor.green, "mcts-rollout");

    std::env::remove_var("SIEGE_ACTOR_BLUE");
    std::env::remove_var("SIEGE_ACTOR_GREEN");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
data_dir = "/custom/data"

[board]
size = 5

[actor]
games = 100
blue = "mcts-learned"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.data_dir, "/custom/data");
    assert_eq!(config.board.size, 5);
    assert_eq!(config.actor.games, 100);
    assert_eq!(config.actor.blue, "mcts-learned");
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[board]
size = 4
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.board.size, 4);
    assert_eq!(config.common.data_dir, "./data"); // Default
    assert_eq!(config.actor.green, "greedy"); // Default
    assert_eq!(config.mcts.num_simulations, 1000); // Default
}

#[test]
fn test_mcts_config_from_toml() {
    let toml_content = r#"
[mcts]
num_simulations = 1600
c_puct = 2.0
temperature = 0.5
dirichlet_alpha = 0.3
dirichlet_weight = 0.4

[territory]
k = 1.0
b = 3.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.num_simulations, 1600);
    assert!((config.mcts.c_puct - 2.0).abs() < f64::EPSILON);
    assert!((config.mcts.temperature - 0.5).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_alpha - 0.3).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_weight - 0.4).abs() < f64::EPSILON);
    assert!((config.territory.k - 1.0).abs() < f64::EPSILON);
    assert!((config.territory.b - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_load_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[actor]\nseed = 1234\n").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.actor.seed, 1234);
    assert_eq!(config.board.size, 7);
}

#[test]
fn test_load_from_malformed_path_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[board\nsize = ").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.board.size, 7);
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = load_from_path(&dir.path().join("config.toml"));
    assert_eq!(config.actor.seed, 42);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.data_dir, cloned.common.data_dir);
    assert_eq!(config.actor.blue, cloned.actor.blue);
}
