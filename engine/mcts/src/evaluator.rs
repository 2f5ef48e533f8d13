//! Leaf evaluation strategies.
//!
//! Every search variant shares the same tree walk and differs only in how
//! a freshly reached leaf is scored. A [`LeafEvaluator`] supplies, in one
//! call, the priors used to expand the leaf and a value estimate from the
//! point of view of the player to move at that leaf.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use games_siege::{position_value, Board, TerritoryFn, NUM_ACTIONS};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Policy has {got} entries, expected {expected}")]
    InvalidPolicyLength { expected: usize, got: usize },

    #[error("Evaluator returned a non-finite {0}")]
    NonFinite(&'static str),

    #[error("Evaluator returned {what} {got} outside {min}..={max}")]
    OutOfRange {
        what: &'static str,
        got: f32,
        min: f32,
        max: f32,
    },

    #[error("Policy assigns no mass to any legal action")]
    DegeneratePolicy,

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),
}

/// Priors over the legal actions and a value for the side to move.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafEvaluation {
    /// One `(action, prior)` pair per legal action.
    pub priors: Vec<(u8, f32)>,

    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// Scores a non-terminal leaf board.
pub trait LeafEvaluator: Send + Sync {
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng)
        -> Result<LeafEvaluation, EvaluatorError>;
}

impl<E: LeafEvaluator + ?Sized> LeafEvaluator for Box<E> {
    fn evaluate(
        &self,
        board: &Board,
        rng: &mut ChaCha20Rng,
    ) -> Result<LeafEvaluation, EvaluatorError> {
        (**self).evaluate(board, rng)
    }
}

impl<E: LeafEvaluator + ?Sized> LeafEvaluator for Arc<E> {
    fn evaluate(
        &self,
        board: &Board,
        rng: &mut ChaCha20Rng,
    ) -> Result<LeafEvaluation, EvaluatorError> {
        (**self).evaluate(board, rng)
    }
}

/// Equal prior on every legal action.
pub fn uniform_priors(board: &Board) -> Vec<(u8, f32)> {
    let actions = board.available_actions();
    if actions.is_empty() {
        return Vec::new();
    }
    let prob = 1.0 / actions.len() as f32;
    actions.into_iter().map(|a| (a, prob)).collect()
}

/// Plays uniformly random legal moves to the end of the game.
///
/// The value is the exact result of that playout. Every move adds a wall,
/// so a playout always ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloutEvaluator;

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Result of one random playout from `board`, for its side to move.
    pub fn rollout(board: &Board, rng: &mut ChaCha20Rng) -> Result<f32, EvaluatorError> {
        let me = board.active_player();
        let mut sim = board.copy();
        loop {
            if let Some(outcome) = sim.outcome() {
                return Ok(outcome.value_for(me));
            }
            let actions = sim.available_actions();
            let action = *actions.choose(rng).ok_or_else(|| {
                EvaluatorError::EvaluationFailed("non-terminal board without legal actions".into())
            })?;
            sim.do_action(action)
                .map_err(|e| EvaluatorError::EvaluationFailed(e.to_string()))?;
        }
    }
}

impl LeafEvaluator for RolloutEvaluator {
    fn evaluate(
        &self,
        board: &Board,
        rng: &mut ChaCha20Rng,
    ) -> Result<LeafEvaluation, EvaluatorError> {
        Ok(LeafEvaluation {
            priors: uniform_priors(board),
            value: Self::rollout(board, rng)?,
        })
    }
}

/// Scores leaves with the territory heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerritoryEvaluator {
    pub territory_fn: TerritoryFn,
}

impl TerritoryEvaluator {
    pub fn new(territory_fn: TerritoryFn) -> Self {
        Self { territory_fn }
    }
}

impl LeafEvaluator for TerritoryEvaluator {
    fn evaluate(
        &self,
        board: &Board,
        _rng: &mut ChaCha20Rng,
    ) -> Result<LeafEvaluation, EvaluatorError> {
        Ok(LeafEvaluation {
            priors: uniform_priors(board),
            value: position_value(board, self.territory_fn),
        })
    }
}

/// An external policy/value function.
///
/// Receives the `[13, len, len]` feature planes of a board and returns a
/// prior for each of the 100 action ids plus a value for the side to move.
/// The caller validates and masks the output.
pub trait PolicyValueFn: Send + Sync {
    fn evaluate(&self, planes: &[f32], board_len: usize)
        -> Result<(Vec<f32>, f32), EvaluatorError>;
}

impl<P: PolicyValueFn + ?Sized> PolicyValueFn for Arc<P> {
    fn evaluate(
        &self,
        planes: &[f32],
        board_len: usize,
    ) -> Result<(Vec<f32>, f32), EvaluatorError> {
        (**self).evaluate(planes, board_len)
    }
}

/// Model-free stand-in: flat priors and a neutral value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicyValue;

impl UniformPolicyValue {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyValueFn for UniformPolicyValue {
    fn evaluate(
        &self,
        _planes: &[f32],
        _board_len: usize,
    ) -> Result<(Vec<f32>, f32), EvaluatorError> {
        Ok((vec![1.0 / NUM_ACTIONS as f32; NUM_ACTIONS], 0.0))
    }
}

/// Leaf evaluation backed by a [`PolicyValueFn`].
#[derive(Debug, Clone, Default)]
pub struct LearnedEvaluator<P> {
    model: P,
}

impl<P: PolicyValueFn> LearnedEvaluator<P> {
    pub fn new(model: P) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &P {
        &self.model
    }
}

impl<P: PolicyValueFn> LeafEvaluator for LearnedEvaluator<P> {
    fn evaluate(
        &self,
        board: &Board,
        _rng: &mut ChaCha20Rng,
    ) -> Result<LeafEvaluation, EvaluatorError> {
        let planes = board.feature_planes();
        let (policy, value) = self.model.evaluate(&planes, board.len())?;

        if policy.len() != NUM_ACTIONS {
            return Err(EvaluatorError::InvalidPolicyLength {
                expected: NUM_ACTIONS,
                got: policy.len(),
            });
        }
        if !value.is_finite() {
            return Err(EvaluatorError::NonFinite("value"));
        }
        if policy.iter().any(|p| !p.is_finite()) {
            return Err(EvaluatorError::NonFinite("prior"));
        }
        if !(-1.0..=1.0).contains(&value) {
            return Err(EvaluatorError::OutOfRange {
                what: "value",
                got: value,
                min: -1.0,
                max: 1.0,
            });
        }
        if let Some(&p) = policy.iter().find(|&&p| p < 0.0) {
            return Err(EvaluatorError::OutOfRange {
                what: "prior",
                got: p,
                min: 0.0,
                max: f32::INFINITY,
            });
        }

        let legal: Vec<(u8, f32)> = board
            .available_actions()
            .into_iter()
            .map(|a| (a, policy[a as usize]))
            .collect();
        let total: f32 = legal.iter().map(|(_, p)| p).sum();
        if total <= 0.0 {
            return Err(EvaluatorError::DegeneratePolicy);
        }

        Ok(LeafEvaluation {
            priors: legal.into_iter().map(|(a, p)| (a, p / total)).collect(),
            value,
        })
    }
}

/// The three leaf evaluation schemes, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Rollout,
    Territory,
    Learned,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Rollout, Variant::Territory, Variant::Learned];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Rollout => "rollout",
            Variant::Territory => "territory",
            Variant::Learned => "learned",
        }
    }

    /// Build the evaluator for this variant.
    ///
    /// `model` is only consulted by [`Variant::Learned`].
    pub fn evaluator(
        self,
        territory_fn: TerritoryFn,
        model: Arc<dyn PolicyValueFn>,
    ) -> Box<dyn LeafEvaluator> {
        match self {
            Variant::Rollout => Box::new(RolloutEvaluator::new()),
            Variant::Territory => Box::new(TerritoryEvaluator::new(territory_fn)),
            Variant::Learned => Box::new(LearnedEvaluator::new(model)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown search variant '{}'", s))
    }
}
