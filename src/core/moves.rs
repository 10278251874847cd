//! Move representation: target cell + mover + captured cells.
//!
//! A move is legal only when its flip set is non-empty. Equality and hashing
//! are structural over the target cell alone, so a move produced by the
//! generator compares equal to one parsed from a coordinate.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::side::Side;

/// Board cells as a 64-bit mask (bit `i` = cell `i`, row-major, a1 = 0).
pub type CellMask = u64;

/// Iterate the cell indices set in a mask, lowest first.
pub fn mask_cells(mut mask: CellMask) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        if mask == 0 {
            None
        } else {
            let idx = mask.trailing_zeros() as u8;
            mask &= mask - 1;
            Some(idx)
        }
    })
}

/// Mask with a single cell set. `cell` must be below 64.
#[inline]
#[must_use]
pub const fn cell_bit(cell: u8) -> CellMask {
    debug_assert!(cell < 64, "cell index out of range");
    1u64 << cell
}

/// A disc placement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Move {
    /// Target cell index (0..64).
    pub cell: u8,

    /// Side placing the disc.
    pub side: Side,

    /// Opponent cells flipped by this placement.
    pub flips: CellMask,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(cell: u8, side: Side, flips: CellMask) -> Self {
        Self { cell, side, flips }
    }

    /// Number of discs flipped.
    #[must_use]
    pub const fn flip_count(&self) -> u32 {
        self.flips.count_ones()
    }

    /// Row (0..8) of the target cell.
    #[must_use]
    pub const fn row(&self) -> u8 {
        self.cell / 8
    }

    /// Column (0..8) of the target cell.
    #[must_use]
    pub const fn col(&self) -> u8 {
        self.cell % 8
    }

    /// Parse a coordinate such as `d3` into a cell index.
    #[must_use]
    pub fn parse_cell(coord: &str) -> Option<u8> {
        let mut chars = coord.chars();
        let col = chars.next()?.to_ascii_lowercase();
        let row = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&col) || !('1'..='8').contains(&row) {
            return None;
        }
        Some((row as u8 - b'1') * 8 + (col as u8 - b'a'))
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.hash(state);
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_cells() {
        let cells: Vec<_> = mask_cells(cell_bit(3) | cell_bit(40) | cell_bit(63)).collect();
        assert_eq!(cells, vec![3, 40, 63]);
        assert_eq!(mask_cells(0).count(), 0);
    }

    #[test]
    fn test_equality_is_by_target() {
        let a = Move::new(19, Side::Black, cell_bit(27));
        let b = Move::new(19, Side::White, 0);
        let c = Move::new(20, Side::Black, cell_bit(27));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_coordinates() {
        let mv = Move::new(19, Side::Black, cell_bit(27));
        assert_eq!(format!("{}", mv), "d3");
        assert_eq!(Move::parse_cell("d3"), Some(19));
        assert_eq!(Move::parse_cell("A1"), Some(0));
        assert_eq!(Move::parse_cell("h8"), Some(63));
        assert_eq!(Move::parse_cell("i1"), None);
        assert_eq!(Move::parse_cell("a9"), None);
        assert_eq!(Move::parse_cell("a10"), None);
    }

    #[test]
    fn test_flip_count() {
        let mv = Move::new(0, Side::White, cell_bit(1) | cell_bit(2) | cell_bit(9));
        assert_eq!(mv.flip_count(), 3);
    }
}
