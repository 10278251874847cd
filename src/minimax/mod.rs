//! Depth-limited adversarial search.
//!
//! Negamax with alpha-beta pruning over `Position` values, a static
//! evaluator (disc parity plus corner control), and optional move ordering
//! by a positional cell-weight table.
//!
//! ```
//! use reversi_engine::core::{CancelToken, Position};
//! use reversi_engine::minimax::{MinimaxConfig, MinimaxSearch};
//!
//! let mut search = MinimaxSearch::new(MinimaxConfig::default().with_depth(3));
//! let outcome = search.search(&Position::initial(), &CancelToken::new()).unwrap();
//! assert!(outcome.chosen.is_some());
//! ```

pub mod config;
pub mod eval;
pub mod search;

pub use config::MinimaxConfig;
pub use eval::{corner_difference, heuristic, CELL_WEIGHTS, WIN_SCORE};
pub use search::MinimaxSearch;
