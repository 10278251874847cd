//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Iteration driver: how the select/expand/simulate/backpropagate cycle is
/// scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MctsVariant {
    /// One worker, fixed-size blocks of iterations.
    #[default]
    Sequential,
    /// Many workers sharing one tree; select+expand under a lock.
    RootParallel,
    /// One independent subtree per root move, each with its own worker.
    TreeParallel,
    /// Sequential, with UCT blended towards RAVE estimates.
    Rave,
}

impl std::fmt::Display for MctsVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MctsVariant::Sequential => "sequential",
            MctsVariant::RootParallel => "root-parallel",
            MctsVariant::TreeParallel => "tree-parallel",
            MctsVariant::Rave => "rave",
        };
        write!(f, "{name}")
    }
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Iteration driver.
    pub variant: MctsVariant,

    /// UCT exploration constant (default: 1.41).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// RAVE equivalence parameter `k`: real visits at which the RAVE
    /// estimate and the real win rate weigh roughly the same.
    pub rave_equivalence: f64,

    /// Hard cap on iterations per search call.
    pub iterations: u32,

    /// Wall-clock budget per search call in milliseconds (None = iterations only).
    pub time_limit_ms: Option<u64>,

    /// Iterations between deadline checks in the sequential drivers.
    pub block_size: u32,

    /// Worker threads for the parallel drivers (0 = available parallelism).
    pub workers: usize,

    /// Random seed for rollouts and expansion choices.
    /// Same seed produces deterministic sequential searches.
    pub seed: u64,

    /// Maximum nodes to allocate in the tree.
    /// Leaves past this limit are simulated without being expanded.
    pub max_nodes: usize,

    /// Carry the chosen subtree over to the next search call.
    pub reuse_tree: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            variant: MctsVariant::Sequential,
            exploration_constant: 1.41,
            rave_equivalence: 1000.0,
            iterations: 10_000,
            time_limit_ms: Some(1000),
            block_size: 64,
            workers: 0,
            seed: 42,
            max_nodes: 2_000_000,
            reuse_tree: true,
        }
    }
}

impl MctsConfig {
    /// Create a new config with a different driver.
    pub fn with_variant(mut self, variant: MctsVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with an iteration cap.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a new config with a time budget (None = iterations only).
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit_ms = limit.map(|d| d.as_millis() as u64);
        self
    }

    /// Create a new config with a worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create a new config with tree reuse on or off.
    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse_tree = reuse;
        self
    }

    /// Time budget as a duration.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Clamp budgets to at least one unit and resolve the worker count.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.iterations == 0 {
            log::warn!("mcts iteration cap 0 clamped to 1");
            self.iterations = 1;
        }
        if self.time_limit_ms == Some(0) {
            log::warn!("mcts time limit 0ms clamped to 1ms");
            self.time_limit_ms = Some(1);
        }
        if self.block_size == 0 {
            log::warn!("mcts block size 0 clamped to 1");
            self.block_size = 1;
        }
        if self.max_nodes == 0 {
            log::warn!("mcts node limit 0 clamped to 1");
            self.max_nodes = 1;
        }
        if self.workers == 0 {
            self.workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        }
        self
    }
}
