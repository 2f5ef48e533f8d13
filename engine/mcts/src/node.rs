//! MCTS tree node representation.
//!
//! Nodes do not store a board. The search replays the path from the root on
//! a fresh copy of the root board every simulation, so a node only carries
//! the statistics used for selection.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent
    pub action: u8,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of backed-up values, from the point of view of the player who
    /// made the move into this node. Q(s,a) = value_sum / visit_count.
    pub value_sum: f32,

    /// Prior probability P(s,a) of choosing this node's action at the parent.
    pub prior: f32,

    /// Set once a simulation reaches this node and finds the game over.
    pub is_terminal: bool,

    /// Children: Vec of (action, NodeId) pairs.
    /// Empty until node is expanded.
    pub children: Vec<(u8, NodeId)>,
}

impl MctsNode {
    pub fn new_root() -> Self {
        Self::new_child(NodeId::NONE, 0, 1.0)
    }

    pub fn new_child(parent: NodeId, action: u8, prior: f32) -> Self {
        Self {
            parent,
            action,
            visit_count: 0,
            value_sum: 0.0,
            prior,
            is_terminal: false,
            children: Vec::new(),
        }
    }

    /// Calculate mean value Q(s,a) = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// PUCT score for child selection.
    /// PUCT(s,a) = Q(s,a) + c_puct * P(s,a) * sqrt(N_parent) / (1 + N(s,a))
    ///
    /// Q is already stored from the parent's side to move, so it is used
    /// as is. Takes a pre-computed sqrt(N_parent) since siblings share it.
    #[inline]
    pub fn ucb_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        self.mean_value() + u
    }

    #[inline]
    pub fn ucb_score_with_parent_visits(&self, parent_visits: u32, c_puct: f32) -> f32 {
        self.ucb_score((parent_visits as f32).sqrt(), c_puct)
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this is a leaf node (not expanded or terminal).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || !self.is_expanded()
    }

    /// Get the most visited child action.
    pub fn best_child_by_visits<'a>(&self, arena: &'a [MctsNode]) -> Option<(u8, &'a MctsNode)> {
        self.children
            .iter()
            .map(|(action, id)| (*action, &arena[id.0 as usize]))
            .max_by_key(|(_, node)| node.visit_count)
    }

    /// Visit count distribution over children as (action, fraction) pairs.
    pub fn visit_distribution(&self, arena: &[MctsNode]) -> Vec<(u8, f32)> {
        let total_visits: u32 = self
            .children
            .iter()
            .map(|(_, id)| arena[id.0 as usize].visit_count)
            .sum();

        if total_visits == 0 {
            return Vec::new();
        }

        self.children
            .iter()
            .map(|(action, id)| {
                let node = &arena[id.0 as usize];
                (*action, node.visit_count as f32 / total_visits as f32)
            })
            .collect()
    }
}
