//! Uniform random player.

use crate::core::{CancelToken, GameRng, Position};
use crate::error::{EngineError, Result};
use crate::rules;
use crate::stats::{SearchOutcome, SearchStats};

use super::Strategy;

/// Picks a uniformly random legal move.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    /// Create a random player with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn search(&mut self, position: &Position, _cancel: &CancelToken) -> Result<SearchOutcome> {
        if rules::is_terminal(position) {
            return Err(EngineError::GameOver);
        }
        let moves = position.legal_moves();
        let chosen = self.rng.choose(&moves).copied();
        Ok(SearchOutcome {
            chosen,
            stats: SearchStats::default(),
        })
    }

    fn name(&self) -> String {
        "random".to_string()
    }
}
