//! Action selection policies for the actor

use anyhow::{anyhow, Context, Result};
use games_siege::{encode, position_value, Board, TerritoryFn, Wall, STAY};
use mcts::{MctsConfig, PolicyValueFn, Variant};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::mcts_policy::MctsPolicy;

/// Trait for action selection policies.
///
/// Implementations are driven from a blocking worker thread, one call per
/// move, and must only return actions legal on `board`.
pub trait Policy: Send {
    /// Agent name as written in game records
    fn name(&self) -> &str;

    /// Choose an action for the side to move.
    fn select_action(&mut self, board: &Board) -> Result<u8>;
}

/// Random policy that selects legal actions uniformly at random.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn select_action(&mut self, board: &Board) -> Result<u8> {
        board
            .available_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("No legal moves available"))
    }
}

/// Stays in place every turn and walls the first open edge, which ends the
/// game as fast as the rules allow. Falls back to the first legal action if
/// no stay action is legal.
#[derive(Debug, Default)]
pub struct QuickestPolicy;

impl Policy for QuickestPolicy {
    fn name(&self) -> &str {
        "quickest"
    }

    fn select_action(&mut self, board: &Board) -> Result<u8> {
        Wall::ALL
            .iter()
            .map(|&wall| encode(STAY, wall))
            .find(|&action| board.is_legal(action))
            .or_else(|| board.available_actions().first().copied())
            .ok_or_else(|| anyhow!("No legal moves available"))
    }
}

/// One-ply territory lookahead.
///
/// Every legal action is applied to a copy of the board and scored by the
/// territory heuristic from the mover's side; finished games score their
/// exact result. With probability `exploration` a random legal action is
/// played instead.
#[derive(Debug)]
pub struct GreedyTerritoryPolicy {
    territory_fn: TerritoryFn,
    exploration: f64,
    rng: ChaCha20Rng,
}

impl GreedyTerritoryPolicy {
    pub const DEFAULT_EXPLORATION: f64 = 0.1;

    pub fn with_seed(territory_fn: TerritoryFn, seed: u64) -> Self {
        Self {
            territory_fn,
            exploration: Self::DEFAULT_EXPLORATION,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Set the probability of playing a random move.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration.clamp(0.0, 1.0);
        self
    }

    /// Score of each legal action for the side to move.
    pub fn scores(&self, board: &Board) -> Result<Vec<(u8, f32)>> {
        board
            .available_actions()
            .into_iter()
            .map(|action| {
                let mut next = board.copy();
                next.do_action(action)
                    .with_context(|| format!("scoring action {}", action))?;
                // `next` is seen from the opponent's side
                Ok((action, -position_value(&next, self.territory_fn)))
            })
            .collect()
    }
}

impl Policy for GreedyTerritoryPolicy {
    fn name(&self) -> &str {
        match self.territory_fn {
            TerritoryFn::Step => "greedy",
            TerritoryFn::Sigmoid { .. } => "greedy-sigmoid",
        }
    }

    fn select_action(&mut self, board: &Board) -> Result<u8> {
        if self.rng.gen_bool(self.exploration) {
            return board
                .available_actions()
                .choose(&mut self.rng)
                .copied()
                .ok_or_else(|| anyhow!("No legal moves available"));
        }

        let scores = self.scores(board)?;
        let best = scores
            .iter()
            .map(|&(_, s)| s)
            .fold(f32::NEG_INFINITY, f32::max);
        let ties: Vec<u8> = scores
            .iter()
            .filter(|&&(_, s)| s >= best)
            .map(|&(a, _)| a)
            .collect();

        ties.choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("No legal moves available"))
    }
}

/// Named agent kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSpec {
    Random,
    /// Stay put and wall the first open edge
    Quickest,
    /// Greedy lookahead with the step ownership curve
    Greedy,
    /// Greedy lookahead with the sigmoid ownership curve
    GreedySigmoid,
    Mcts(Variant),
}

impl FromStr for AgentSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "random" => Ok(AgentSpec::Random),
            "quickest" => Ok(AgentSpec::Quickest),
            "greedy" => Ok(AgentSpec::Greedy),
            "greedy-sigmoid" => Ok(AgentSpec::GreedySigmoid),
            other => match other.strip_prefix("mcts-") {
                Some(variant) => variant
                    .parse::<Variant>()
                    .map(AgentSpec::Mcts)
                    .map_err(|e| anyhow!(e)),
                None => Err(anyhow!(
                    "unknown agent '{}', expected one of random, quickest, greedy, greedy-sigmoid, \
                     mcts-rollout, mcts-territory, mcts-learned",
                    other
                )),
            },
        }
    }
}

impl fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentSpec::Random => f.write_str("random"),
            AgentSpec::Quickest => f.write_str("quickest"),
            AgentSpec::Greedy => f.write_str("greedy"),
            AgentSpec::GreedySigmoid => f.write_str("greedy-sigmoid"),
            AgentSpec::Mcts(variant) => write!(f, "mcts-{}", variant),
        }
    }
}

/// Shared settings used when building agents.
#[derive(Clone)]
pub struct AgentSettings {
    pub mcts: MctsConfig,
    /// Ownership curve for the territory search variant and greedy-sigmoid
    pub territory_fn: TerritoryFn,
    /// Policy/value function behind `mcts-learned`
    pub model: Arc<dyn PolicyValueFn>,
}

impl AgentSpec {
    pub fn build(self, settings: &AgentSettings, seed: u64) -> Box<dyn Policy> {
        match self {
            AgentSpec::Random => Box::new(RandomPolicy::with_seed(seed)),
            AgentSpec::Quickest => Box::new(QuickestPolicy),
            AgentSpec::Greedy => Box::new(GreedyTerritoryPolicy::with_seed(TerritoryFn::Step, seed)),
            AgentSpec::GreedySigmoid => Box::new(GreedyTerritoryPolicy::with_seed(
                settings.territory_fn,
                seed,
            )),
            AgentSpec::Mcts(variant) => {
                let evaluator = variant.evaluator(settings.territory_fn, Arc::clone(&settings.model));
                Box::new(MctsPolicy::with_seed(
                    variant,
                    evaluator,
                    settings.mcts.clone(),
                    seed,
                ))
            }
        }
    }
}
