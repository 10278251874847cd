//! # reversi-engine
//!
//! Decision engine for two-player Reversi on an 8x8 board.
//!
//! ## Design Principles
//!
//! 1. **Positions are values**: `Position` is `Copy`; every search works on
//!    its own copies and never mutates the caller's board.
//!
//! 2. **One tree, many drivers**: all MCTS variants share one arena tree and
//!    one iteration core; they differ only in scheduling.
//!
//! 3. **Results, not globals**: every search call returns its telemetry in a
//!    `SearchOutcome` next to the chosen move.
//!
//! ## Modules
//!
//! - `core`: sides, cells, positions, moves, RNG, search budgets
//! - `rules`: move generation, terminal detection, results
//! - `minimax`: negamax alpha-beta with a parity/corner evaluator
//! - `mcts`: arena tree, UCT/RAVE policies, sequential and parallel drivers
//! - `strategy`: the `Strategy` trait and a config-driven factory
//! - `stats`: per-search telemetry
//! - `error`: `EngineError`

pub mod core;
pub mod error;
pub mod mcts;
pub mod minimax;
pub mod rules;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use crate::core::{
    CancelToken, Cell, CellMask, Deadline, GameRng, Move, Position, Side, CELL_COUNT, CORNERS,
};

pub use crate::error::{EngineError, Result};

pub use crate::rules::Outcome;

pub use crate::minimax::{MinimaxConfig, MinimaxSearch};

pub use crate::mcts::{
    MctsConfig, MctsEngine, MctsNode, MctsTree, MctsVariant, NodeId, RootVisit, TreeStats,
};

pub use crate::stats::{SearchOutcome, SearchStats};

pub use crate::strategy::{RandomStrategy, Strategy, StrategyConfig};
