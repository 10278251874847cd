//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MctsNode>` with index-based references. Promoting a
//! child to root only moves the root index and clears the child's parent
//! link; abandoned siblings stay in the arena until `compact_if_sparse`
//! copies the live subtree into a fresh arena.

use smallvec::SmallVec;

use super::config::MctsConfig;
use super::node::{MctsNode, NodeId};
use super::policy::{Rollout, SelectionPolicy};
use crate::core::{cell_bit, GameRng, Position};
use crate::rules::Outcome;

/// Arena-based MCTS tree.
#[derive(Clone, Debug)]
pub struct MctsTree {
    /// All nodes in the arena, reachable or not.
    nodes: Vec<MctsNode>,

    /// The current root.
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree with a root node.
    pub fn new(position: Position) -> Self {
        Self::with_capacity(position, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(position: Position, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MctsNode::root(position));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the arena, including unreachable ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MctsNode {
        self.get(self.root)
    }

    /// Node IDs of the subtree under `id` (inclusive), parents before children.
    #[must_use]
    pub fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.get(current).children.iter().rev().copied());
        }
        order
    }

    // === Search-tree operations ===

    /// Descend from `from` while the current node has children, following
    /// the highest-scoring child. Returns the leaf reached.
    #[must_use]
    pub fn select(
        &self,
        from: NodeId,
        policy: &dyn SelectionPolicy,
        config: &MctsConfig,
    ) -> NodeId {
        let mut current = from;
        while !self.get(current).is_leaf() {
            current = self.select_child(current, policy, config);
        }
        current
    }

    /// Highest-scoring child of a non-leaf node. Ties go to the first child.
    #[must_use]
    pub fn select_child(
        &self,
        id: NodeId,
        policy: &dyn SelectionPolicy,
        config: &MctsConfig,
    ) -> NodeId {
        let parent = self.get(id);
        let mut best = parent.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &parent.children {
            let score = policy.score(parent, self.get(child), config);
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// Create one child per legal move of a non-terminal leaf, or a single
    /// pass child when the side to move is blocked.
    ///
    /// Returns the number of children created (0 if not expandable).
    pub fn expand(&mut self, id: NodeId) -> usize {
        let node = self.get(id);
        if !node.is_expandable() {
            return 0;
        }
        let position = node.position;
        let depth = node.depth + 1;

        let moves = position.legal_moves();
        let children: SmallVec<[NodeId; 16]> = if moves.is_empty() {
            let pass = MctsNode::new(position.pass(), id, None, depth);
            std::iter::once(self.alloc(pass)).collect()
        } else {
            moves
                .iter()
                .map(|mv| self.alloc(MctsNode::new(position.apply(mv), id, Some(*mv), depth)))
                .collect()
        };

        let count = children.len();
        self.get_mut(id).children = children;
        count
    }

    /// Expand a selected leaf and pick the node to simulate from.
    ///
    /// Leaves are expanded while the arena holds fewer than `max_nodes`
    /// nodes; a uniformly random new child is then returned. Terminal leaves
    /// and leaves past the node limit are simulated as they are.
    /// Returns the node and the number of children created.
    pub fn expand_and_pick(
        &mut self,
        leaf: NodeId,
        max_nodes: usize,
        rng: &mut GameRng,
    ) -> (NodeId, usize) {
        if self.len() >= max_nodes {
            return (leaf, 0);
        }
        let created = self.expand(leaf);
        let node = rng
            .choose(&self.get(leaf).children)
            .copied()
            .unwrap_or(leaf);
        (node, created)
    }

    /// Record a simulation result on `from` and every ancestor up to the root.
    ///
    /// Takes `&self`: counters are atomic. Returns the number of nodes updated.
    pub fn backpropagate(&self, from: NodeId, outcome: &Outcome) -> usize {
        let mut touched = 0;
        let mut current = from;
        loop {
            let node = self.get(current);
            node.stats.record(outcome, node.mover());
            touched += 1;
            if current == self.root || node.parent.is_none() {
                return touched;
            }
            current = node.parent;
        }
    }

    /// Backpropagate and additionally credit RAVE statistics.
    ///
    /// At each node on the path, every child whose reaching move was played
    /// later in the same simulation by that child's mover gets a RAVE sample.
    /// "Later" covers the tree moves below the node and the rollout.
    pub fn backpropagate_rave(&self, from: NodeId, rollout: &Rollout) -> usize {
        let outcome = &rollout.outcome;
        let mut played = rollout.played;
        let mut touched = 0;
        let mut current = from;
        loop {
            let node = self.get(current);
            for &child_id in &node.children {
                let child = self.get(child_id);
                if let Some(mv) = child.reached_by {
                    if played[mv.side.index()] & cell_bit(mv.cell) != 0 {
                        child.stats.record_rave(outcome, mv.side);
                    }
                }
            }
            node.stats.record(outcome, node.mover());
            touched += 1;
            if let Some(mv) = node.reached_by {
                played[mv.side.index()] |= cell_bit(mv.cell);
            }
            if current == self.root || node.parent.is_none() {
                return touched;
            }
            current = node.parent;
        }
    }

    /// Child with the most visits; ties go to the first child.
    #[must_use]
    pub fn best_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child in &self.get(id).children {
            let visits = self.get(child).visits();
            if best.map_or(true, |(_, v)| visits > v) {
                best = Some((child, visits));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Child of `id` whose position equals `position`.
    #[must_use]
    pub fn find_child(&self, id: NodeId, position: &Position) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).position == *position)
    }

    // === Root management ===

    /// Make `child` the root. Siblings become unreachable; statistics of the
    /// promoted subtree are untouched.
    pub fn promote(&mut self, child: NodeId) {
        self.get_mut(child).parent = NodeId::NONE;
        self.root = child;
    }

    /// Carry a cached tree forward to `position`.
    ///
    /// Returns the cached tree if its root already is `position`, or the tree
    /// re-rooted at the root's child matching `position`; `None` otherwise.
    #[must_use]
    pub fn reuse(cached: Option<MctsTree>, position: &Position) -> Option<MctsTree> {
        let mut tree = cached?;
        if tree.root_node().position == *position {
            return Some(tree);
        }
        let child = tree.find_child(tree.root, position)?;
        tree.promote(child);
        Some(tree)
    }

    /// Copy the subtree under `id` into a fresh arena rooted at index 0.
    #[must_use]
    pub fn extract(&self, id: NodeId) -> MctsTree {
        let order = self.subtree_ids(id);
        let base_depth = self.get(id).depth;
        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        for (new_idx, old) in order.iter().enumerate() {
            remap[old.index()] = NodeId::new(new_idx as u32);
        }

        let nodes = order
            .iter()
            .map(|&old| {
                let mut node = self.get(old).clone();
                node.parent = if old == id {
                    NodeId::NONE
                } else {
                    remap[node.parent.index()]
                };
                node.depth -= base_depth;
                for child in node.children.iter_mut() {
                    *child = remap[child.index()];
                }
                node
            })
            .collect();

        MctsTree {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Replace the `slot`-th child of `parent` with the root of `subtree`,
    /// appending the subtree's nodes to this arena.
    ///
    /// The replaced child's old subtree becomes unreachable. Returns the new
    /// child ID.
    pub fn graft(&mut self, parent: NodeId, slot: usize, subtree: MctsTree) -> NodeId {
        let offset = self.nodes.len() as u32;
        let depth_base = self.get(parent).depth + 1;
        let sub_root = subtree.root;
        let shift = |id: NodeId| NodeId::new(id.0 + offset);

        let MctsTree { nodes, .. } = subtree;
        self.nodes.extend(nodes.into_iter().enumerate().map(|(i, mut node)| {
            node.parent = if i == sub_root.index() {
                parent
            } else {
                shift(node.parent)
            };
            node.depth += depth_base;
            for child in node.children.iter_mut() {
                *child = shift(*child);
            }
            node
        }));

        let new_id = shift(sub_root);
        self.get_mut(parent).children[slot] = new_id;
        new_id
    }

    /// Drop unreachable nodes when they make up more than half the arena.
    ///
    /// Returns true if the arena was rebuilt.
    pub fn compact_if_sparse(&mut self) -> bool {
        let live = self.subtree_ids(self.root).len();
        if live * 2 >= self.nodes.len() {
            return false;
        }
        log::debug!("compacting mcts arena: {} live of {} nodes", live, self.nodes.len());
        *self = self.extract(self.root);
        true
    }

    /// Get statistics about the reachable tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let ids = self.subtree_ids(self.root);
        let base_depth = self.root_node().depth;
        let max_depth = ids
            .iter()
            .map(|&id| self.get(id).depth - base_depth)
            .max()
            .unwrap_or(0);
        let terminal_count = ids.iter().filter(|&&id| self.get(id).is_terminal).count();

        TreeStats {
            node_count: ids.len(),
            arena_len: self.nodes.len(),
            max_depth,
            terminal_count,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Nodes reachable from the root.
    pub node_count: usize,

    /// Nodes held in the arena.
    pub arena_len: usize,

    /// Maximum depth below the root.
    pub max_depth: u16,

    /// Number of reachable terminal nodes.
    pub terminal_count: usize,
}
