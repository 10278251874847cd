//! Minimax integration tests.

use std::time::Duration;

use proptest::prelude::*;

use reversi_engine::core::{CancelToken, Cell, Position, Side};
use reversi_engine::minimax::{MinimaxConfig, MinimaxSearch};
use reversi_engine::rules;
use reversi_engine::EngineError;

/// Reach a mid-game position by always playing the `pick`-th legal move.
fn advance(picks: &[u8]) -> Position {
    let mut position = Position::initial();
    for &pick in picks {
        if position.is_terminal() {
            break;
        }
        let moves = position.legal_moves();
        position = if moves.is_empty() {
            position.pass()
        } else {
            position.apply(&moves[pick as usize % moves.len()])
        };
    }
    position
}

// =============================================================================
// Pruning Safety
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Alpha-beta picks the same move as plain negamax at equal depth.
    #[test]
    fn prop_pruning_never_changes_move(
        picks in prop::collection::vec(any::<u8>(), 0..20),
        depth in 1u32..4,
        ordering in any::<bool>(),
    ) {
        let position = advance(&picks);
        prop_assume!(!position.is_terminal());
        prop_assume!(!position.legal_moves().is_empty());

        let config = MinimaxConfig::default()
            .with_depth(depth)
            .with_move_ordering(ordering);
        let mut search = MinimaxSearch::new(config);
        let pruned = search.search(&position, &CancelToken::new()).unwrap();
        let (plain_move, plain_score) = search.search_unpruned(&position, depth).unwrap();

        prop_assert_eq!(pruned.chosen, Some(plain_move));
        prop_assert_eq!(pruned.stats.score, plain_score);
    }
}

// =============================================================================
// Behavior
// =============================================================================

/// Minimax never returns anything outside the legal move set.
#[test]
fn test_minimax_plays_legal_game() {
    let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(3));
    let cancel = CancelToken::new();
    let mut position = Position::initial();

    while !position.is_terminal() {
        let outcome = search.search(&position, &cancel).unwrap();
        position = match outcome.chosen {
            Some(mv) => {
                assert!(position.legal_moves().contains(&mv));
                position.apply(&mv)
            }
            None => position.pass(),
        };
    }
    assert!(rules::result(&position).is_some());
    assert_eq!(
        position.empty_count() + position.count(Side::Black) + position.count(Side::White),
        64
    );
}

/// A capturable corner is taken at depth 1.
#[test]
fn test_minimax_takes_corner() {
    // Black can capture into a1 along the diagonal.
    let mut position = Position::empty(Side::Black);
    position.set_cell(9, Cell::White);
    position.set_cell(18, Cell::Black);
    position.set_cell(20, Cell::White);
    position.set_cell(21, Cell::Black);

    let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(1));
    let outcome = search.search(&position, &CancelToken::new()).unwrap();
    assert_eq!(outcome.chosen.map(|m| m.cell), Some(0));
}

/// With a time budget the search still completes at least depth 1.
#[test]
fn test_time_limited_search_returns_move() {
    let config = MinimaxConfig::default()
        .with_depth(12)
        .with_time_limit(Duration::from_millis(20));
    let mut search = MinimaxSearch::new(config);
    let outcome = search.search(&Position::initial(), &CancelToken::new()).unwrap();

    assert!(outcome.chosen.is_some());
    assert!(outcome.stats.depth_reached >= 1);
    assert!(outcome.stats.nodes_searched > 0);
}

/// Cancelling before the search starts yields no move.
#[test]
fn test_cancelled_minimax() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(4));

    assert_eq!(
        search.search(&Position::initial(), &cancel).unwrap_err(),
        EngineError::Cancelled
    );
}

/// Zero depth is clamped instead of producing an undefined move.
#[test]
fn test_zero_depth_is_clamped() {
    let search = MinimaxSearch::new(MinimaxConfig::default().with_depth(0));
    assert_eq!(search.config().depth, 1);
}
