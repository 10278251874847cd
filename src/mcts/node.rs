//! MCTS node structures.
//!
//! Nodes live in an arena (`MctsTree`) and refer to each other by `NodeId`.
//! A node owns its children through the arena; the parent link is only used
//! to walk back up during backpropagation and never keeps anything alive.
//!
//! Statistics are atomics so concurrent workers can backpropagate through a
//! shared tree without holding the structural lock.

use std::sync::atomic::{AtomicU32, Ordering};

use smallvec::SmallVec;

use super::atomic::AtomicF64;
use crate::core::{Move, Position, Side};
use crate::rules::Outcome;

/// Index into the MctsTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Visit and reward counters of a node.
///
/// Rewards are oriented to the node's mover (the side whose move reached
/// the node). RAVE counters hold all-moves-as-first estimates for that move.
#[derive(Debug, Default)]
pub struct NodeStats {
    visits: AtomicU32,
    wins: AtomicU32,
    score: AtomicF64,
    rave_visits: AtomicU32,
    rave_score: AtomicF64,
}

impl NodeStats {
    /// Simulations that passed through this node.
    #[inline]
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Simulations the mover won.
    #[inline]
    #[must_use]
    pub fn wins(&self) -> u32 {
        self.wins.load(Ordering::Relaxed)
    }

    /// Cumulative reward (1 win, 0.5 draw, 0 loss).
    #[inline]
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score.load(Ordering::Relaxed)
    }

    /// Mean reward, 0 when unvisited.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        let visits = self.visits();
        if visits == 0 {
            0.0
        } else {
            self.score() / visits as f64
        }
    }

    /// RAVE sample count.
    #[inline]
    #[must_use]
    pub fn rave_visits(&self) -> u32 {
        self.rave_visits.load(Ordering::Relaxed)
    }

    /// Mean RAVE reward, 0 when unsampled.
    #[must_use]
    pub fn rave_win_rate(&self) -> f64 {
        let visits = self.rave_visits();
        if visits == 0 {
            0.0
        } else {
            self.rave_score.load(Ordering::Relaxed) / visits as f64
        }
    }

    /// Record one simulation result for `mover`.
    pub fn record(&self, outcome: &Outcome, mover: Side) {
        self.visits.fetch_add(1, Ordering::Relaxed);
        if outcome.is_winner(mover) {
            self.wins.fetch_add(1, Ordering::Relaxed);
        }
        self.score.fetch_add(outcome.reward(mover), Ordering::Relaxed);
    }

    /// Record `n` identical simulation results for `mover`.
    pub fn record_n(&self, outcome: &Outcome, mover: Side, n: u32) {
        if n == 0 {
            return;
        }
        self.visits.fetch_add(n, Ordering::Relaxed);
        if outcome.is_winner(mover) {
            self.wins.fetch_add(n, Ordering::Relaxed);
        }
        self.score
            .fetch_add(outcome.reward(mover) * n as f64, Ordering::Relaxed);
    }

    /// Record one all-moves-as-first sample for `mover`.
    pub fn record_rave(&self, outcome: &Outcome, mover: Side) {
        self.rave_visits.fetch_add(1, Ordering::Relaxed);
        self.rave_score
            .fetch_add(outcome.reward(mover), Ordering::Relaxed);
    }
}

impl Clone for NodeStats {
    fn clone(&self) -> Self {
        Self {
            visits: AtomicU32::new(self.visits()),
            wins: AtomicU32::new(self.wins()),
            score: self.score.clone(),
            rave_visits: AtomicU32::new(self.rave_visits()),
            rave_score: self.rave_score.clone(),
        }
    }
}

/// A node in the MCTS tree.
#[derive(Clone, Debug)]
pub struct MctsNode {
    /// Position at this node (the reaching move already applied).
    pub position: Position,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move from the parent that led here (None for root and passes).
    pub reached_by: Option<Move>,

    /// Depth in the arena (the original root = 0).
    pub depth: u16,

    /// Neither side can move from here.
    pub is_terminal: bool,

    /// Child nodes, one per legal move (or a single pass child).
    pub children: SmallVec<[NodeId; 16]>,

    /// Visit and reward counters.
    pub stats: NodeStats,
}

impl MctsNode {
    /// Create a new node.
    pub fn new(position: Position, parent: NodeId, reached_by: Option<Move>, depth: u16) -> Self {
        Self {
            position,
            parent,
            reached_by,
            depth,
            is_terminal: position.is_terminal(),
            children: SmallVec::new(),
            stats: NodeStats::default(),
        }
    }

    /// Create a root node.
    pub fn root(position: Position) -> Self {
        Self::new(position, NodeId::NONE, None, 0)
    }

    /// The side whose move (or pass) produced this node.
    #[inline]
    #[must_use]
    pub fn mover(&self) -> Side {
        !self.position.side_to_move()
    }

    /// Has this node no children yet?
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Can this node still be expanded?
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.is_leaf() && !self.is_terminal
    }

    /// Simulations that passed through this node.
    #[inline]
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.stats.visits()
    }
}
