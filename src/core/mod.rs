//! Core engine types: sides, positions, moves, RNG, search budgets.
//!
//! Everything here is game-state plumbing with no search logic. Searches in
//! `minimax` and `mcts` only ever see `Position` values.

pub mod side;
pub mod board;
pub mod moves;
pub mod rng;
pub mod budget;

pub use side::{Cell, Side};
pub use board::{Position, CELL_COUNT, CORNERS};
pub use moves::{cell_bit, mask_cells, CellMask, Move};
pub use rng::GameRng;
pub use budget::{CancelToken, Deadline};
