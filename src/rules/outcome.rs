//! Terminal detection and game results.

use serde::{Deserialize, Serialize};

use super::movegen::has_legal_move;
use crate::core::{Position, Side};

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Side with strictly more discs.
    Winner(Side),
    /// Equal disc counts.
    Draw,
}

impl Outcome {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, Outcome::Winner(w) if *w == side)
    }

    /// Reward for `side`: 1 for a win, 0 for a loss, 0.5 for a draw.
    #[must_use]
    pub fn reward(&self, side: Side) -> f64 {
        match self {
            Outcome::Winner(w) if *w == side => 1.0,
            Outcome::Winner(_) => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

/// True when neither side has a legal move.
#[must_use]
pub fn is_terminal(position: &Position) -> bool {
    !has_legal_move(position, position.side_to_move())
        && !has_legal_move(position, !position.side_to_move())
}

/// Winner by disc count. Only meaningful on a terminal position.
#[must_use]
pub fn winner(position: &Position) -> Outcome {
    let black = position.count(Side::Black);
    let white = position.count(Side::White);
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Outcome::Winner(Side::Black),
        std::cmp::Ordering::Less => Outcome::Winner(Side::White),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// `Some(outcome)` if the game is over, `None` if it continues.
#[must_use]
pub fn result(position: &Position) -> Option<Outcome> {
    is_terminal(position).then(|| winner(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    #[test]
    fn test_outcome_rewards() {
        let win = Outcome::Winner(Side::White);
        assert!(win.is_winner(Side::White));
        assert!(!win.is_winner(Side::Black));
        assert_eq!(win.reward(Side::White), 1.0);
        assert_eq!(win.reward(Side::Black), 0.0);
        assert_eq!(Outcome::Draw.reward(Side::Black), 0.5);
        assert!(!Outcome::Draw.is_winner(Side::Black));
    }

    #[test]
    fn test_initial_not_terminal() {
        assert!(!is_terminal(&Position::initial()));
        assert_eq!(result(&Position::initial()), None);
    }

    #[test]
    fn test_single_colour_board_is_terminal() {
        let mut pos = Position::empty(Side::White);
        pos.set_cell(0, Cell::Black);
        pos.set_cell(10, Cell::Black);
        assert!(is_terminal(&pos));
        assert_eq!(result(&pos), Some(Outcome::Winner(Side::Black)));
    }

    #[test]
    fn test_terminal_draw() {
        let mut pos = Position::empty(Side::Black);
        // Far apart: no ray connects them.
        pos.set_cell(0, Cell::Black);
        pos.set_cell(63, Cell::White);
        pos.set_cell(7, Cell::Black);
        pos.set_cell(56, Cell::White);
        assert!(is_terminal(&pos));
        assert_eq!(winner(&pos), Outcome::Draw);
    }

    #[test]
    fn test_terminal_check_keeps_side_to_move() {
        let pos = Position::initial().with_side_to_move(Side::White);
        let _ = is_terminal(&pos);
        assert_eq!(pos.side_to_move(), Side::White);
    }
}
