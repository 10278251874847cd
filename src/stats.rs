//! Per-search telemetry returned alongside the chosen move.
//!
//! Read-only and advisory: display code consumes it, move selection never
//! depends on it.

use serde::{Deserialize, Serialize};

use crate::core::Move;

/// Statistics collected during one search call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// MCTS iterations completed (select, expand, simulate, backpropagate).
    pub iterations: u32,

    /// Positions visited during rollouts.
    pub rollout_plies: u64,

    /// Nodes added to the MCTS tree.
    pub nodes_expanded: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,

    /// Predicted win rate of the chosen move, for the side that plays it.
    pub win_rate: f64,

    /// Visit count of the chosen node (tree size under it).
    pub chosen_visits: u32,

    /// Visits carried over from the previous search by tree reuse.
    pub reused_visits: u32,

    /// Deepest tree node reached.
    pub max_depth: u16,

    /// Worker threads used.
    pub workers: usize,

    /// Minimax nodes searched.
    pub nodes_searched: u64,

    /// Deepest fully completed minimax iteration.
    pub depth_reached: u32,

    /// Minimax score of the chosen move, from the mover's perspective.
    pub score: i32,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Calculate rollout positions per second.
    #[must_use]
    pub fn rollouts_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.rollout_plies as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

/// What a search call produced.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    /// The chosen move, or `None` when the side to move must pass.
    pub chosen: Option<Move>,

    /// Telemetry for this call.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Outcome for a side with no legal move.
    #[must_use]
    pub fn pass(stats: SearchStats) -> Self {
        Self { chosen: None, stats }
    }

    /// Did the search decide to pass?
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.chosen.is_none()
    }
}
