//! Negamax alpha-beta search.
//!
//! Depth-bounded, with passes searched at the same depth. With a time
//! budget the search deepens iteratively and keeps the deepest completed
//! result; the first iteration always completes unless cancelled. The clock
//! and the cancel token are polled before every root move and every
//! `POLL_INTERVAL` nodes.

use crate::core::{CancelToken, Deadline, Move, Position};
use crate::error::{EngineError, Result};
use crate::rules;
use crate::stats::{SearchOutcome, SearchStats};

use super::config::MinimaxConfig;
use super::eval::{heuristic, order_moves, terminal_score};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = i32::MAX / 2;

/// Nodes between deadline/cancel polls.
const POLL_INTERVAL: u64 = 1024;

/// Minimax search context.
pub struct MinimaxSearch {
    /// Search configuration.
    config: MinimaxConfig,

    /// Statistics of the last search.
    stats: SearchStats,
}

impl MinimaxSearch {
    /// Create a new minimax search context.
    pub fn new(config: MinimaxConfig) -> Self {
        Self {
            config: config.normalized(),
            stats: SearchStats::default(),
        }
    }

    /// Choose a move for the side to move.
    ///
    /// Never mutates `position`. Returns a pass outcome when the side to move
    /// has no legal move, and `GameOver` on a terminal position.
    pub fn search(&mut self, position: &Position, cancel: &CancelToken) -> Result<SearchOutcome> {
        self.stats.reset();
        let deadline = Deadline::after(self.config.time_limit());

        if rules::is_terminal(position) {
            return Err(EngineError::GameOver);
        }
        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return Ok(SearchOutcome::pass(self.stats.clone()));
        }
        if self.config.move_ordering {
            order_moves(&mut moves);
        }

        let first_depth = if self.config.time_limit_ms.is_some() {
            1
        } else {
            self.config.depth
        };

        let mut best: Option<(Move, i32)> = None;
        let mut nodes = 0;
        for depth in first_depth..=self.config.depth {
            // The first iteration ignores the clock so a move always exists.
            let clock = if best.is_some() { deadline } else { Deadline::unbounded() };
            let mut searcher = Negamax {
                config: &self.config,
                deadline: clock,
                cancel,
                nodes: 0,
                aborted: false,
            };
            let result = searcher.root(position, &moves, depth);
            nodes += searcher.nodes;
            if searcher.aborted {
                log::trace!("minimax depth {depth} aborted after {} nodes", searcher.nodes);
                break;
            }
            if let Some((mv, score)) = result {
                log::trace!("minimax depth {depth}: {mv} ({score})");
                // Try the previous best first at the next depth.
                if let Some(pos) = moves.iter().position(|m| *m == mv) {
                    moves[..=pos].rotate_right(1);
                }
                best = Some((mv, score));
                self.stats.depth_reached = depth;
            }
            if deadline.should_stop(cancel) {
                break;
            }
        }

        self.stats.nodes_searched = nodes;
        self.stats.time_us = deadline.elapsed().as_micros() as u64;

        let (mv, score) = best.ok_or(EngineError::Cancelled)?;
        self.stats.score = score;
        log::debug!(
            "minimax chose {mv} (score {score}, depth {}, {} nodes, {}us)",
            self.stats.depth_reached,
            self.stats.nodes_searched,
            self.stats.time_us
        );
        Ok(SearchOutcome {
            chosen: Some(mv),
            stats: self.stats.clone(),
        })
    }

    /// Plain negamax without pruning, at exactly `depth`.
    ///
    /// Uses the same move order as `search`. Exponential; intended for
    /// verifying that pruning never changes the chosen move.
    pub fn search_unpruned(&self, position: &Position, depth: u32) -> Option<(Move, i32)> {
        let mut moves = position.legal_moves();
        if self.config.move_ordering {
            order_moves(&mut moves);
        }
        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            let score = -plain_negamax(&self.config, &position.apply(&mv), depth.max(1) - 1);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((mv, score));
            }
        }
        best
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the configuration.
    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }
}

/// One depth iteration of the pruned search.
struct Negamax<'a> {
    config: &'a MinimaxConfig,
    deadline: Deadline,
    cancel: &'a CancelToken,
    nodes: u64,
    aborted: bool,
}

impl Negamax<'_> {
    fn root(&mut self, position: &Position, moves: &[Move], depth: u32) -> Option<(Move, i32)> {
        let mut alpha = -INF;
        let mut best = None;
        for mv in moves {
            if self.deadline.should_stop(self.cancel) {
                self.aborted = true;
                return None;
            }
            let score = -self.negamax(&position.apply(mv), depth - 1, -INF, -alpha);
            if self.aborted {
                return None;
            }
            if score > alpha {
                alpha = score;
                best = Some((*mv, score));
            }
        }
        best
    }

    fn negamax(&mut self, position: &Position, depth: u32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if self.nodes % POLL_INTERVAL == 0 && self.deadline.should_stop(self.cancel) {
            self.aborted = true;
        }
        if self.aborted {
            return 0;
        }

        let side = position.side_to_move();
        if rules::is_terminal(position) {
            return terminal_score(position, side);
        }
        if depth == 0 {
            return heuristic(position, side, self.config);
        }

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return -self.negamax(&position.pass(), depth, -beta, -alpha);
        }
        if self.config.move_ordering {
            order_moves(&mut moves);
        }

        let mut best = -INF;
        for mv in &moves {
            let score = -self.negamax(&position.apply(mv), depth - 1, -beta, -alpha);
            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

fn plain_negamax(config: &MinimaxConfig, position: &Position, depth: u32) -> i32 {
    let side = position.side_to_move();
    if rules::is_terminal(position) {
        return terminal_score(position, side);
    }
    if depth == 0 {
        return heuristic(position, side, config);
    }
    let mut moves = position.legal_moves();
    if moves.is_empty() {
        return -plain_negamax(config, &position.pass(), depth);
    }
    if config.move_ordering {
        order_moves(&mut moves);
    }
    moves
        .iter()
        .map(|mv| -plain_negamax(config, &position.apply(mv), depth - 1))
        .max()
        .unwrap_or(-INF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, Side};

    #[test]
    fn test_search_returns_legal_move() {
        let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(3));
        let pos = Position::initial();

        let outcome = search.search(&pos, &CancelToken::new()).unwrap();
        let mv = outcome.chosen.unwrap();

        assert!(pos.legal_moves().contains(&mv));
        assert_eq!(outcome.stats.depth_reached, 3);
        assert!(outcome.stats.nodes_searched > 0);
    }

    #[test]
    fn test_search_does_not_mutate_position() {
        let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(2));
        let pos = Position::initial();
        let copy = pos;
        search.search(&pos, &CancelToken::new()).unwrap();
        assert_eq!(pos, copy);
    }

    #[test]
    fn test_takes_free_corner() {
        // White on b1 sits between a Black c1 and an empty a1: a1 wins a corner.
        let mut pos = Position::empty(Side::Black);
        pos.set_cell(1, Cell::White);
        pos.set_cell(2, Cell::Black);
        pos.set_cell(27, Cell::Black);
        pos.set_cell(28, Cell::White);
        pos.set_cell(35, Cell::White);
        pos.set_cell(36, Cell::Black);

        let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(1));
        let outcome = search.search(&pos, &CancelToken::new()).unwrap();
        assert_eq!(outcome.chosen.unwrap().cell, 0);
    }

    #[test]
    fn test_terminal_position_is_error() {
        let mut pos = Position::empty(Side::Black);
        pos.set_cell(0, Cell::Black);
        let mut search = MinimaxSearch::new(MinimaxConfig::default());
        assert_eq!(
            search.search(&pos, &CancelToken::new()).unwrap_err(),
            EngineError::GameOver
        );
    }

    #[test]
    fn test_no_move_is_pass() {
        // Black cannot flank the corner disc; White can capture b1 from c1.
        let mut pos = Position::empty(Side::Black);
        pos.set_cell(0, Cell::White);
        pos.set_cell(1, Cell::Black);
        let outcome = MinimaxSearch::new(MinimaxConfig::default())
            .search(&pos, &CancelToken::new())
            .unwrap();
        assert!(outcome.is_pass());
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(2));
        let result = search.search(&Position::initial(), &cancel);
        assert_eq!(result.unwrap_err(), EngineError::Cancelled);
    }

    #[test]
    fn test_pruned_matches_unpruned() {
        let config = MinimaxConfig::default().with_depth(3);
        let mut search = MinimaxSearch::new(config);
        let mut pos = Position::initial();
        for _ in 0..4 {
            let expected = search.search_unpruned(&pos, 3).unwrap();
            let outcome = search.search(&pos, &CancelToken::new()).unwrap();
            assert_eq!(outcome.chosen.unwrap(), expected.0);
            assert_eq!(outcome.stats.score, expected.1);
            pos = pos.apply(&expected.0);
        }
    }

    #[test]
    fn test_time_limited_search_completes_depth_one() {
        let config = MinimaxConfig::default()
            .with_depth(30)
            .with_time_limit(std::time::Duration::from_millis(20));
        let mut search = MinimaxSearch::new(config);
        let outcome = search.search(&Position::initial(), &CancelToken::new()).unwrap();
        assert!(outcome.chosen.is_some());
        assert!(outcome.stats.depth_reached >= 1);
        assert!(outcome.stats.depth_reached < 30);
    }
}
