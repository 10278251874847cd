//! Static evaluation for the minimax search.

use crate::core::{cell_bit, Move, Position, Side, CORNERS};
use crate::rules::{self, Outcome};

use super::config::MinimaxConfig;

/// Score of a decided game, well above any heuristic value.
pub const WIN_SCORE: i32 = 1_000_000;

/// Classic positional weights, used to order moves.
#[rustfmt::skip]
pub const CELL_WEIGHTS: [i32; 64] = [
    100, -20,  10,   5,   5,  10, -20, 100,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
    100, -20,  10,   5,   5,  10, -20, 100,
];

/// Corners owned by `side` minus corners owned by the opponent.
#[must_use]
pub fn corner_difference(position: &Position, side: Side) -> i32 {
    let own = position.discs(side);
    let theirs = position.discs(!side);
    CORNERS.iter().fold(0, |acc, &corner| {
        let bit = cell_bit(corner);
        acc + i32::from(own & bit != 0) - i32::from(theirs & bit != 0)
    })
}

/// Heuristic score of `position` for `side`.
///
/// `parity_weight * discs(side) + corner_weight * corner_difference(side)`.
#[must_use]
pub fn heuristic(position: &Position, side: Side, config: &MinimaxConfig) -> i32 {
    config.parity_weight * position.count(side) as i32
        + config.corner_weight * corner_difference(position, side)
}

/// Score of a finished game for `side`.
#[must_use]
pub fn terminal_score(position: &Position, side: Side) -> i32 {
    match rules::winner(position) {
        Outcome::Winner(w) if w == side => WIN_SCORE,
        Outcome::Winner(_) => -WIN_SCORE,
        Outcome::Draw => 0,
    }
}

/// Sort moves by descending cell weight. Stable, so equal weights keep
/// generator order.
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| std::cmp::Reverse(CELL_WEIGHTS[mv.cell as usize]));
}
