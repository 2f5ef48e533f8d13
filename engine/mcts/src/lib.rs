//! Monte Carlo Tree Search (MCTS) for Siege.
//!
//! # Overview
//!
//! MCTS builds a search tree by running simulations. Each simulation
//! consists of four phases:
//!
//! 1. **Selection**: Traverse the tree with the PUCT rule to balance
//!    exploration and exploitation
//! 2. **Expansion**: When reaching a leaf, add a child for each legal action
//! 3. **Evaluation**: Ask a [`LeafEvaluator`] for priors and a value
//! 4. **Backpropagation**: Update visit counts and value sums along the path
//!    from leaf to root, flipping sign at every ply
//!
//! The search never mutates the caller's board. Each simulation works on
//! its own copy, replaying the selected path from the root.
//!
//! # Usage
//!
//! ```rust
//! use games_siege::Board;
//! use mcts::{run_mcts, MctsConfig, TerritoryEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = Board::default();
//! let evaluator = TerritoryEvaluator::default();
//! let config = MctsConfig::for_testing();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&board, &evaluator, config, &mut rng).unwrap();
//! assert!(board.is_legal(result.action));
//! ```
//!
//! # Evaluators
//!
//! - [`RolloutEvaluator`]: uniform priors, value from one random playout
//! - [`TerritoryEvaluator`]: uniform priors, value from the territory heuristic
//! - [`LearnedEvaluator`]: priors and value from a [`PolicyValueFn`]
//!
//! [`Variant`] names these three for configuration.

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use evaluator::{
    uniform_priors, EvaluatorError, LeafEvaluation, LeafEvaluator, LearnedEvaluator,
    PolicyValueFn, RolloutEvaluator, TerritoryEvaluator, UniformPolicyValue, Variant,
};
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
