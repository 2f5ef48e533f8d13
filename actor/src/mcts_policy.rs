//! MCTS-based policy
//!
//! Wraps one of the search variants (rollout, territory or learned leaf
//! evaluation) behind the [`Policy`] trait. Each call runs a complete search
//! from the given board; nothing is carried over between moves.

use anyhow::{anyhow, Result};
use games_siege::Board;
use mcts::{run_mcts, LeafEvaluator, MctsConfig, SearchResult, Variant};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::Instant;
use tracing::debug;

use crate::policy::Policy;

pub struct MctsPolicy {
    name: String,
    variant: Variant,
    evaluator: Box<dyn LeafEvaluator>,
    config: MctsConfig,
    /// RNG for rollouts, noise and action sampling
    rng: ChaCha20Rng,
}

impl std::fmt::Debug for MctsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsPolicy")
            .field("variant", &self.variant)
            .field("num_simulations", &self.config.num_simulations)
            .field("c_puct", &self.config.c_puct)
            .finish()
    }
}

impl MctsPolicy {
    /// Create with a specific seed for determinism
    pub fn with_seed(
        variant: Variant,
        evaluator: Box<dyn LeafEvaluator>,
        config: MctsConfig,
        seed: u64,
    ) -> Self {
        Self {
            name: format!("mcts-{}", variant),
            variant,
            evaluator,
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Run a full search from `board`.
    pub fn search(&mut self, board: &Board) -> Result<SearchResult> {
        let start = Instant::now();
        let result = run_mcts(
            board,
            self.evaluator.as_ref(),
            self.config.clone(),
            &mut self.rng,
        )
        .map_err(|e| anyhow!("MCTS search failed: {}", e))?;

        debug!(
            variant = %self.variant,
            action = result.action,
            value = result.value,
            simulations = result.simulations,
            tree_nodes = result.stats.total_nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "MCTS selected action"
        );

        Ok(result)
    }
}

impl Policy for MctsPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, board: &Board) -> Result<u8> {
        Ok(self.search(board)?.action)
    }
}
