//! MCTS search implementation.
//!
//! Each simulation copies the root board and walks down the tree:
//! 1. Selection: follow the highest PUCT child, replaying its action
//! 2. Expansion: a non-terminal leaf gets one child per legal action
//! 3. Evaluation: the leaf evaluator scores the leaf (terminal leaves use
//!    the exact result instead)
//! 4. Backpropagation: update statistics along the path with alternating sign

use games_siege::{Board, BoardError, NUM_ACTIONS};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{EvaluatorError, LeafEvaluator};
use crate::node::NodeId;
use crate::tree::{MctsTree, TreeStats};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen action
    pub action: u8,

    /// Visit distribution over all action ids
    pub policy: Vec<f32>,

    /// Value estimate at the root, for the side to move
    pub value: f32,

    /// Number of simulations performed
    pub simulations: u32,

    pub stats: TreeStats,
}

/// One search from a fixed root board.
pub struct MctsSearch<'a, E: LeafEvaluator + ?Sized> {
    tree: MctsTree,
    root_board: Board,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, E: LeafEvaluator + ?Sized> MctsSearch<'a, E> {
    /// Prepare a search from `board`. The board itself is never mutated.
    pub fn new(board: &Board, evaluator: &'a E, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if board.is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }
        Ok(Self {
            tree: MctsTree::new(),
            root_board: board.copy(),
            evaluator,
            config,
        })
    }

    /// Run the configured number of simulations and pick an action.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        for _ in 0..self.config.num_simulations {
            self.simulate(rng)?;
        }

        let policy = self.tree.root_policy(NUM_ACTIONS, self.config.temperature);
        let action = if self.config.temperature < 1e-6 {
            self.tree
                .best_action()
                .map(|(a, _)| a)
                .ok_or(SearchError::NoLegalMoves)?
        } else {
            sample_action(&policy, rng)?
        };

        let stats = self.tree.stats();
        debug!(
            action,
            visits = stats.root_visits,
            nodes = stats.total_nodes,
            depth = stats.max_depth,
            value = stats.root_value,
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            policy,
            value: stats.root_value,
            simulations: stats.root_visits,
            stats,
        })
    }

    /// Run a single simulation (select -> expand -> evaluate -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let mut board = self.root_board.copy();
        let (leaf_id, depth) = self.select(&mut board)?;

        // Value for the side to move at the leaf
        let value = match board.outcome() {
            Some(outcome) => {
                self.tree.get_mut(leaf_id).is_terminal = true;
                outcome.value_for(board.active_player())
            }
            None => {
                let eval = self.evaluator.evaluate(&board, rng)?;
                self.tree.expand(leaf_id, &eval.priors);
                if leaf_id == self.tree.root() && self.config.dirichlet_alpha > 0.0 {
                    self.add_dirichlet_noise(rng);
                }
                eval.value
            }
        };

        // Stored values are seen by the player who moved into each node
        self.tree.backpropagate(leaf_id, -value);

        trace!(
            leaf = leaf_id.0,
            depth,
            value,
            terminal = board.is_terminal(),
            "MCTS simulation complete"
        );

        Ok(())
    }

    /// Walk from the root to a leaf, replaying the chosen actions on `board`.
    fn select(&self, board: &mut Board) -> Result<(NodeId, u32), SearchError> {
        let mut current = self.tree.root();
        let mut depth = 0;

        while !self.tree.get(current).is_leaf() {
            match self.tree.select_child(current, self.config.c_puct) {
                Some((action, child_id)) => {
                    board.do_action(action)?;
                    current = child_id;
                    depth += 1;
                }
                None => break,
            }
        }

        Ok((current, depth))
    }

    /// Mix Dirichlet noise into the root priors.
    fn add_dirichlet_noise(&mut self, rng: &mut ChaCha20Rng) {
        let root_id = self.tree.root();
        let children: Vec<NodeId> = self
            .tree
            .get(root_id)
            .children
            .iter()
            .map(|(_, id)| *id)
            .collect();

        if children.is_empty() {
            return;
        }

        let noise = dirichlet_noise(children.len(), self.config.dirichlet_alpha, rng);
        let eps = self.config.dirichlet_epsilon;
        for (child_id, n) in children.into_iter().zip(noise) {
            let child = self.tree.get_mut(child_id);
            child.prior = (1.0 - eps) * child.prior + eps * n;
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Sample an action from a probability distribution.
fn sample_action(policy: &[f32], rng: &mut ChaCha20Rng) -> Result<u8, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i as u8);
        }
    }

    // Rounding can leave the cumulative sum just under 1
    for (i, &p) in policy.iter().enumerate().rev() {
        if p > 0.0 {
            return Ok(i as u8);
        }
    }

    Err(SearchError::NoLegalMoves)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Vec<f32> {
    use rand_distr::{Distribution, Gamma};

    let Ok(gamma) = Gamma::new(alpha as f64, 1.0) else {
        return vec![1.0 / n as f32; n];
    };
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    }

    samples
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<E: LeafEvaluator + ?Sized>(
    board: &Board,
    evaluator: &E,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board, evaluator, config)?;
    search.run(rng)
}
