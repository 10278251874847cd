//! Board position: the value type every search operates on.
//!
//! ## Representation
//!
//! - Two occupancy masks (one per side), bit `i` = cell `i`
//! - Side to move
//! - Last move applied (`None` at the start and after a pass)
//!
//! `Position` is `Copy`: applying a move returns a new position and never
//! touches the original, so positions are never shared-mutable across
//! search workers.

use serde::{Deserialize, Serialize};

use super::moves::{cell_bit, CellMask, Move};
use super::side::{Cell, Side};
use crate::error::EngineError;
use crate::rules;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 64;

/// Corner cells (a1, h1, a8, h8).
pub const CORNERS: [u8; 4] = [0, 7, 56, 63];

/// A board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    black: CellMask,
    white: CellMask,
    to_move: Side,
    last_move: Option<u8>,
}

impl Position {
    /// The standard opening: d4/e5 Black, e4/d5 White, Black to move.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            black: cell_bit(27) | cell_bit(36),
            white: cell_bit(28) | cell_bit(35),
            to_move: Side::Black,
            last_move: None,
        }
    }

    /// An empty board.
    #[must_use]
    pub const fn empty(to_move: Side) -> Self {
        Self {
            black: 0,
            white: 0,
            to_move,
            last_move: None,
        }
    }

    /// Build a position from explicit cell contents.
    #[must_use]
    pub fn from_cells(cells: &[Cell; CELL_COUNT], to_move: Side) -> Self {
        let mut position = Self::empty(to_move);
        for (idx, cell) in cells.iter().enumerate() {
            position.set_cell(idx as u8, *cell);
        }
        position
    }

    /// Parse a board from 64 cell characters (whitespace ignored).
    ///
    /// `.`/`-` is empty, `X`/`B` is Black, `O`/`W` is White. Row 1 comes first.
    pub fn parse(board: &str, to_move: Side) -> Result<Self, EngineError> {
        let mut cells = [Cell::Empty; CELL_COUNT];
        let mut count = 0;
        for c in board.chars().filter(|c| !c.is_whitespace()) {
            if count == CELL_COUNT {
                return Err(EngineError::InvalidBoard(format!(
                    "more than {CELL_COUNT} cells"
                )));
            }
            cells[count] = Cell::from_char(c)
                .ok_or_else(|| EngineError::InvalidBoard(format!("unexpected character {c:?}")))?;
            count += 1;
        }
        if count != CELL_COUNT {
            return Err(EngineError::InvalidBoard(format!(
                "expected {CELL_COUNT} cells, found {count}"
            )));
        }
        Ok(Self::from_cells(&cells, to_move))
    }

    /// Occupancy of a cell.
    #[inline]
    #[must_use]
    pub fn cell(&self, idx: u8) -> Cell {
        let bit = cell_bit(idx);
        if self.black & bit != 0 {
            Cell::Black
        } else if self.white & bit != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Overwrite a single cell. `idx` must be below 64.
    pub fn set_cell(&mut self, idx: u8, cell: Cell) {
        let bit = cell_bit(idx);
        self.black &= !bit;
        self.white &= !bit;
        match cell {
            Cell::Black => self.black |= bit,
            Cell::White => self.white |= bit,
            Cell::Empty => {}
        }
    }

    /// Cells occupied by a side.
    #[inline]
    #[must_use]
    pub const fn discs(&self, side: Side) -> CellMask {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Empty cells.
    #[inline]
    #[must_use]
    pub const fn empties(&self) -> CellMask {
        !(self.black | self.white)
    }

    /// Number of discs a side has.
    #[inline]
    #[must_use]
    pub const fn count(&self, side: Side) -> u32 {
        self.discs(side).count_ones()
    }

    /// Number of empty cells.
    #[must_use]
    pub const fn empty_count(&self) -> u32 {
        self.empties().count_ones()
    }

    /// Side to move.
    #[inline]
    #[must_use]
    pub const fn side_to_move(&self) -> Side {
        self.to_move
    }

    /// Target cell of the last move applied, if any.
    #[must_use]
    pub const fn last_move(&self) -> Option<u8> {
        self.last_move
    }

    /// Return a copy with a different side to move.
    #[must_use]
    pub const fn with_side_to_move(mut self, side: Side) -> Self {
        self.to_move = side;
        self
    }

    /// Apply a move and hand the turn to the opponent.
    ///
    /// The move must come from the generator for this position.
    #[must_use]
    pub fn apply(&self, mv: &Move) -> Self {
        debug_assert!(mv.flips != 0, "move {mv} captures nothing");
        debug_assert_eq!(self.cell(mv.cell), Cell::Empty, "move {mv} targets an occupied cell");

        let placed = cell_bit(mv.cell) | mv.flips;
        let mut next = *self;
        match mv.side {
            Side::Black => {
                next.black |= placed;
                next.white &= !mv.flips;
            }
            Side::White => {
                next.white |= placed;
                next.black &= !mv.flips;
            }
        }
        next.to_move = !mv.side;
        next.last_move = Some(mv.cell);
        next
    }

    /// Hand the turn to the opponent without placing a disc.
    #[must_use]
    pub const fn pass(&self) -> Self {
        let mut next = *self;
        next.to_move = self.to_move.opponent();
        next.last_move = None;
        next
    }

    /// Legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(self)
    }

    /// True when neither side can move.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        rules::is_terminal(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..8u8 {
            write!(f, "{}", row + 1)?;
            for col in 0..8u8 {
                write!(f, " {}", self.cell(row * 8 + col).to_char())?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.to_move)
    }
}
