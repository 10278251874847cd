//! Ray-based legal move and capture generation.
//!
//! For a candidate empty cell, each of the eight ray directions is walked
//! while it crosses opponent discs. A ray qualifies when it crosses at least
//! one opponent disc and ends on one of the mover's discs; the capture set of
//! the cell is the union of its qualifying rays.
//!
//! Distances to the board edge per (cell, direction) are computed once and
//! bound every walk, so the inner loop never bounds-checks coordinates.

use std::sync::OnceLock;

use crate::core::{cell_bit, CellMask, Move, Position, Side, CELL_COUNT};

/// Row/column deltas of the eight ray directions.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Number of cells between each cell and the board edge, per direction.
pub type EdgeTable = [[u8; 8]; CELL_COUNT];

/// The edge-distance table, built on first use.
pub fn edge_distances() -> &'static EdgeTable {
    static TABLE: OnceLock<EdgeTable> = OnceLock::new();
    TABLE.get_or_init(build_edge_distances)
}

fn build_edge_distances() -> EdgeTable {
    let mut table = [[0u8; 8]; CELL_COUNT];
    for (idx, entry) in table.iter_mut().enumerate() {
        let row = (idx / 8) as i8;
        let col = (idx % 8) as i8;
        for (dir, &(dr, dc)) in DIRECTIONS.iter().enumerate() {
            let mut steps = 0u8;
            let (mut r, mut c) = (row + dr, col + dc);
            while (0..8).contains(&r) && (0..8).contains(&c) {
                steps += 1;
                r += dr;
                c += dc;
            }
            entry[dir] = steps;
        }
    }
    table
}

#[inline]
const fn direction_offset(dir: usize) -> i8 {
    DIRECTIONS[dir].0 * 8 + DIRECTIONS[dir].1
}

/// Opponent cells captured if `side` plays at `cell`.
///
/// Empty when the placement is illegal. The target cell must be empty and
/// below 64; use `find_move` for unchecked input.
#[must_use]
pub fn captures(position: &Position, cell: u8, side: Side) -> CellMask {
    debug_assert!(cell < 64, "cell index out of range");
    let own = position.discs(side);
    let theirs = position.discs(!side);
    let distances = &edge_distances()[cell as usize];

    let mut flips = 0;
    for (dir, &limit) in distances.iter().enumerate() {
        // A qualifying ray needs at least one opponent disc plus a closing disc.
        if limit < 2 {
            continue;
        }
        let offset = direction_offset(dir);
        let mut ray = 0;
        let mut idx = cell as i8;
        for _ in 0..limit {
            idx += offset;
            let bit = cell_bit(idx as u8);
            if theirs & bit != 0 {
                ray |= bit;
            } else {
                if own & bit != 0 {
                    flips |= ray;
                }
                break;
            }
        }
    }
    flips
}

/// Legal moves for `side`, regardless of whose turn the position records.
#[must_use]
pub fn legal_moves_for(position: &Position, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(16);
    for cell in 0..CELL_COUNT as u8 {
        if position.empties() & cell_bit(cell) == 0 {
            continue;
        }
        let flips = captures(position, cell, side);
        if flips != 0 {
            moves.push(Move::new(cell, side, flips));
        }
    }
    moves
}

/// Legal moves for the side to move.
#[must_use]
pub fn legal_moves(position: &Position) -> Vec<Move> {
    legal_moves_for(position, position.side_to_move())
}

/// Does `side` have at least one legal move?
#[must_use]
pub fn has_legal_move(position: &Position, side: Side) -> bool {
    let empties = position.empties();
    (0..CELL_COUNT as u8)
        .filter(|&cell| empties & cell_bit(cell) != 0)
        .any(|cell| captures(position, cell, side) != 0)
}

/// Look up a legal move for the side to move by target cell.
#[must_use]
pub fn find_move(position: &Position, cell: u8) -> Option<Move> {
    if cell as usize >= CELL_COUNT || position.empties() & cell_bit(cell) == 0 {
        return None;
    }
    let side = position.side_to_move();
    let flips = captures(position, cell, side);
    (flips != 0).then(|| Move::new(cell, side, flips))
}
