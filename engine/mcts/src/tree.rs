//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices.

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MctsTree {
    /// Create a tree holding only a fresh root.
    pub fn new() -> Self {
        Self {
            nodes: vec![MctsNode::new_root()],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest PUCT score.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<(u8, NodeId)> {
        let node = self.get(node_id);
        let parent_visits_sqrt = (node.visit_count as f32).sqrt();

        node.children
            .iter()
            .max_by(|(_, id_a), (_, id_b)| {
                let score_a = self.get(*id_a).ucb_score(parent_visits_sqrt, c_puct);
                let score_b = self.get(*id_b).ucb_score(parent_visits_sqrt, c_puct);
                score_a
                    .partial_cmp(&score_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }

    /// Add a child to a parent node.
    pub fn add_child(&mut self, parent_id: NodeId, action: u8, prior: f32) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, action, prior));
        self.get_mut(parent_id).children.push((action, child_id));
        child_id
    }

    /// Create one child per `(action, prior)` pair.
    pub fn expand(&mut self, node_id: NodeId, priors: &[(u8, f32)]) {
        self.nodes.reserve(priors.len());
        for &(action, prior) in priors {
            self.add_child(node_id, action, prior);
        }
    }

    /// Child of `node_id` reached by `action`, if expanded.
    pub fn child(&self, node_id: NodeId, action: u8) -> Option<NodeId> {
        self.get(node_id)
            .children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }

    /// Backpropagate a value from a leaf to the root.
    ///
    /// `value` is from the point of view of the player who moved into the
    /// leaf. It is negated at each level on the way up.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += current_value;

            current_value = -current_value;
            current_id = node.parent;
        }
    }

    /// Best action from root based on visit counts, as (action, visits).
    pub fn best_action(&self) -> Option<(u8, u32)> {
        let root = self.get(self.root);
        root.best_child_by_visits(&self.nodes)
            .map(|(action, node)| (action, node.visit_count))
    }

    /// Visit distribution at the root, indexed by action id.
    pub fn root_policy(&self, num_actions: usize, temperature: f32) -> Vec<f32> {
        let root = self.get(self.root);
        let mut policy = vec![0.0; num_actions];

        if root.children.is_empty() {
            return policy;
        }

        if temperature < 1e-6 {
            if let Some((action, _)) = self.best_action() {
                policy[action as usize] = 1.0;
            }
        } else {
            let visits: Vec<f32> = root
                .children
                .iter()
                .map(|(_, id)| {
                    let v = self.get(*id).visit_count as f32;
                    if temperature == 1.0 {
                        v
                    } else {
                        v.powf(1.0 / temperature)
                    }
                })
                .collect();

            let total: f32 = visits.iter().sum();
            if total > 0.0 {
                for ((action, _), &v) in root.children.iter().zip(visits.iter()) {
                    policy[*action as usize] = v / total;
                }
            }
        }

        policy
    }

    /// Mean value at the root, for the player to move there.
    pub fn root_value(&self) -> f32 {
        -self.get(self.root).mean_value()
    }

    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: self.root_value(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(id).children.iter().map(|(_, c)| (*c, depth + 1)));
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
