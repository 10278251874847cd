//! MCTS policies for selection and simulation.
//!
//! - `SelectionPolicy`: how to score a child during descent (UCT, UCT+RAVE)
//! - `simulate`: uniform random rollout to the end of the game

use crate::core::{cell_bit, CellMask, GameRng, Position, Side};
use crate::rules::{self, Outcome};

use super::config::MctsConfig;
use super::node::MctsNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for scoring children during selection. The highest score wins.
pub trait SelectionPolicy: Send + Sync {
    /// Score `child` as a candidate below `parent`.
    fn score(&self, parent: &MctsNode, child: &MctsNode, config: &MctsConfig) -> f64;
}

/// UCT: `win_rate + C * sqrt(ln(parent_visits) / child_visits)`.
///
/// Unvisited children score `+inf`.
#[must_use]
pub fn uct_score(win_rate: f64, parent_visits: u32, child_visits: u32, exploration: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }
    let ln_parent = (parent_visits.max(1) as f64).ln();
    win_rate + exploration * (ln_parent / child_visits as f64).sqrt()
}

/// Weight of the RAVE estimate after `visits` real visits.
///
/// `sqrt(k / (3n + k))`: 1 with no visits, shrinking as real visits accrue.
#[must_use]
pub fn rave_beta(visits: u32, equivalence: f64) -> f64 {
    (equivalence / (3.0 * visits as f64 + equivalence)).sqrt()
}

/// Plain UCT selection.
#[derive(Clone, Debug, Default)]
pub struct Uct;

impl SelectionPolicy for Uct {
    fn score(&self, parent: &MctsNode, child: &MctsNode, config: &MctsConfig) -> f64 {
        uct_score(
            child.stats.win_rate(),
            parent.visits(),
            child.visits(),
            config.exploration_constant,
        )
    }
}

/// UCT with the exploitation term blended towards the RAVE estimate.
#[derive(Clone, Debug, Default)]
pub struct RaveUct;

impl SelectionPolicy for RaveUct {
    fn score(&self, parent: &MctsNode, child: &MctsNode, config: &MctsConfig) -> f64 {
        let visits = child.visits();
        if visits == 0 {
            return f64::INFINITY;
        }
        let beta = if child.stats.rave_visits() == 0 {
            0.0
        } else {
            rave_beta(visits, config.rave_equivalence)
        };
        let value = (1.0 - beta) * child.stats.win_rate() + beta * child.stats.rave_win_rate();
        uct_score(value, parent.visits(), visits, config.exploration_constant)
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Result of one random playout.
#[derive(Clone, Debug)]
pub struct Rollout {
    /// Final result.
    pub outcome: Outcome,

    /// Positions visited (moves and passes applied).
    pub plies: u32,

    /// Cells each side played during the playout, indexed by `Side::index`.
    pub played: [CellMask; 2],
}

impl Rollout {
    /// Did `side` play `cell` during the playout?
    #[inline]
    #[must_use]
    pub fn played(&self, side: Side, cell: u8) -> bool {
        self.played[side.index()] & cell_bit(cell) != 0
    }
}

/// Play uniformly random legal moves from `start` until the game ends.
///
/// Works on a private copy; a side with no move passes.
pub fn simulate(start: &Position, rng: &mut GameRng) -> Rollout {
    let mut position = *start;
    let mut plies = 0;
    let mut played = [0; 2];

    loop {
        let moves = position.legal_moves();
        if let Some(mv) = rng.choose(&moves) {
            played[mv.side.index()] |= cell_bit(mv.cell);
            position = position.apply(mv);
        } else if rules::has_legal_move(&position, !position.side_to_move()) {
            position = position.pass();
        } else {
            return Rollout {
                outcome: rules::winner(&position),
                plies,
                played,
            };
        }
        plies += 1;
    }
}
