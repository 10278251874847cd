//! Move-choosing strategies.
//!
//! `Strategy` is the one capability a turn-sequencing front end needs:
//! given a position, pick a legal move or report a pass. Minimax, every MCTS
//! variant and the uniform random player implement it; `StrategyConfig`
//! builds any of them from configuration.

pub mod config;
pub mod random;

pub use config::StrategyConfig;
pub use random::RandomStrategy;

use crate::core::{CancelToken, Position};
use crate::error::Result;
use crate::mcts::MctsEngine;
use crate::minimax::MinimaxSearch;
use crate::stats::SearchOutcome;

/// A move-choosing strategy.
///
/// Implementations never mutate the caller's position and only ever return
/// moves from its legal-move set. `chosen == None` means the side to move
/// must pass.
pub trait Strategy: Send {
    /// Choose a move, polling `cancel` cooperatively.
    fn search(&mut self, position: &Position, cancel: &CancelToken) -> Result<SearchOutcome>;

    /// Short display name.
    fn name(&self) -> String;

    /// Choose a move without external cancellation.
    fn choose_move(&mut self, position: &Position) -> Result<SearchOutcome> {
        self.search(position, &CancelToken::new())
    }
}

impl Strategy for MinimaxSearch {
    fn search(&mut self, position: &Position, cancel: &CancelToken) -> Result<SearchOutcome> {
        MinimaxSearch::search(self, position, cancel)
    }

    fn name(&self) -> String {
        format!("minimax(depth {})", self.config().depth)
    }
}

impl Strategy for MctsEngine {
    fn search(&mut self, position: &Position, cancel: &CancelToken) -> Result<SearchOutcome> {
        MctsEngine::search(self, position, cancel)
    }

    fn name(&self) -> String {
        format!("mcts({})", self.config().variant)
    }
}
