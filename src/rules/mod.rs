//! Game rules: move generation, terminal detection, results.
//!
//! Searches call into these free functions but never interpret the board
//! themselves.

pub mod movegen;
pub mod outcome;

pub use movegen::{
    captures, edge_distances, find_move, has_legal_move, legal_moves, legal_moves_for, DIRECTIONS,
};
pub use outcome::{is_terminal, result, winner, Outcome};
