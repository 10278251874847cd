//! Side and cell identification.
//!
//! ## Side
//!
//! The two players. `Black` is player A (moves first from the standard
//! opening), `White` is player B.
//!
//! ## Cell
//!
//! Tri-state occupancy of one board square.

use serde::{Deserialize, Serialize};
use std::ops::Not;

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player A.
    Black,
    /// Player B.
    White,
}

impl Side {
    /// Both sides, Black first.
    pub const ALL: [Side; 2] = [Side::Black, Side::White];

    /// The other side.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Index usable for per-side arrays (Black = 0, White = 1).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    /// The cell value this side's discs occupy.
    #[inline]
    #[must_use]
    pub const fn cell(self) -> Cell {
        match self {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }

    /// Single-character symbol (`X` for Black, `O` for White).
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Side::Black => 'X',
            Side::White => 'O',
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        self.opponent()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Black => write!(f, "Black"),
            Side::White => write!(f, "White"),
        }
    }
}

/// Occupancy of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The side occupying this cell, if any.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Side::Black),
            Cell::White => Some(Side::White),
        }
    }

    /// Parse a board character: `.`/`-` empty, `X`/`B` black, `O`/`W` white.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '-' => Some(Cell::Empty),
            'X' | 'x' | 'B' | 'b' => Some(Cell::Black),
            'O' | 'o' | 'W' | 'w' => Some(Cell::White),
            _ => None,
        }
    }

    /// Board character for this cell.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(!Side::White, Side::Black);
        assert_eq!(!!Side::Black, Side::Black);
    }

    #[test]
    fn test_side_cell_mapping() {
        for side in Side::ALL {
            assert_eq!(side.cell().side(), Some(side));
        }
        assert_eq!(Cell::Empty.side(), None);
    }

    #[test]
    fn test_cell_chars() {
        for cell in [Cell::Empty, Cell::Black, Cell::White] {
            assert_eq!(Cell::from_char(cell.to_char()), Some(cell));
        }
        assert_eq!(Cell::from_char('B'), Some(Cell::Black));
        assert_eq!(Cell::from_char('w'), Some(Cell::White));
        assert_eq!(Cell::from_char('?'), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Side::Black), "Black");
        assert_eq!(Side::White.symbol(), 'O');
    }
}
