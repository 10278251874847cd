//! Monte Carlo Tree Search for Reversi.
//!
//! ## Overview
//!
//! One arena tree (`MctsTree`) and one iteration core (select, expand,
//! simulate, backpropagate) shared by four drivers:
//!
//! - **Sequential**: a single worker running fixed-size blocks of iterations
//! - **RAVE**: sequential, with selection blended towards all-moves-as-first
//!   estimates
//! - **Root-parallel**: a worker pool on one shared tree; structural changes
//!   are serialized, statistics are atomic
//! - **Tree-parallel**: one private subtree per root move
//!
//! The tree chosen at the end of a call is kept and re-rooted at the next
//! position when it is a child of the kept root.
//!
//! ## Usage
//!
//! ```rust
//! use reversi_engine::core::{CancelToken, Position};
//! use reversi_engine::mcts::{MctsConfig, MctsEngine, MctsVariant};
//!
//! let config = MctsConfig::default()
//!     .with_variant(MctsVariant::Sequential)
//!     .with_iterations(500)
//!     .with_time_limit(None);
//! let mut engine = MctsEngine::new(config);
//!
//! let outcome = engine.search(&Position::initial(), &CancelToken::new()).unwrap();
//! println!("best move: {}", outcome.chosen.unwrap());
//!
//! for visit in engine.root_visits() {
//!     println!("{}: {} visits, {:.1}%", visit.mv, visit.visits, visit.win_rate * 100.0);
//! }
//! ```

pub mod atomic;
pub mod config;
pub mod node;
pub mod parallel;
pub mod policy;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, MctsVariant};
pub use node::{MctsNode, NodeId, NodeStats};
pub use policy::{rave_beta, simulate, uct_score, RaveUct, Rollout, SelectionPolicy, Uct};
pub use search::{MctsEngine, RootVisit};
pub use tree::{MctsTree, TreeStats};
