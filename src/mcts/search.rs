//! MCTS engine: the shared iteration core and the sequential drivers.
//!
//! All four variants run the same select/expand/simulate/backpropagate
//! iteration over an `MctsTree`; they differ only in how iterations are
//! scheduled. The sequential and RAVE drivers live here, the parallel ones
//! in `parallel`.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::core::{CancelToken, Deadline, GameRng, Move, Position, Side};
use crate::error::{EngineError, Result};
use crate::rules::{self, Outcome};
use crate::stats::{SearchOutcome, SearchStats};

use super::config::{MctsConfig, MctsVariant};
use super::node::{NodeId, NodeStats};
use super::parallel;
use super::policy::{simulate, RaveUct, SelectionPolicy, Uct};
use super::tree::MctsTree;

// =============================================================================
// Iteration core
// =============================================================================

/// What one iteration did.
#[derive(Clone, Debug)]
pub(crate) struct Step {
    pub outcome: Outcome,
    pub plies: u32,
    pub expanded: usize,
}

/// One select/expand/simulate/backpropagate iteration from the tree root.
pub(crate) fn iterate(
    tree: &mut MctsTree,
    policy: &dyn SelectionPolicy,
    config: &MctsConfig,
    rng: &mut GameRng,
    rave: bool,
) -> Step {
    let leaf = tree.select(tree.root(), policy, config);
    let (node, expanded) = tree.expand_and_pick(leaf, config.max_nodes, rng);
    let rollout = simulate(&tree.get(node).position, rng);
    if rave {
        tree.backpropagate_rave(node, &rollout);
    } else {
        tree.backpropagate(node, &rollout.outcome);
    }
    Step {
        outcome: rollout.outcome,
        plies: rollout.plies,
        expanded,
    }
}

/// Work counters shared by every worker of one search call.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    iterations: AtomicU32,
    rollout_plies: AtomicU64,
    nodes_expanded: AtomicU32,
}

impl Counters {
    pub fn record(&self, step: &Step) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
        self.rollout_plies
            .fetch_add(u64::from(step.plies), Ordering::Relaxed);
        self.nodes_expanded
            .fetch_add(step.expanded as u32, Ordering::Relaxed);
    }

    pub fn add_expanded(&self, count: usize) {
        self.nodes_expanded
            .fetch_add(count as u32, Ordering::Relaxed);
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.load(Ordering::Relaxed)
    }

    fn write_to(&self, stats: &mut SearchStats) {
        stats.iterations = self.iterations();
        stats.rollout_plies = self.rollout_plies.load(Ordering::Relaxed);
        stats.nodes_expanded = self.nodes_expanded.load(Ordering::Relaxed);
    }
}

/// Simulation results of one worker, by outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub wins: [u32; 2],
    pub draws: u32,
}

impl Tally {
    pub fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Winner(side) => self.wins[side.index()] += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Number of simulations tallied.
    pub fn total(&self) -> u32 {
        self.wins[0] + self.wins[1] + self.draws
    }

    pub fn merge(&mut self, other: &Tally) {
        self.wins[0] += other.wins[0];
        self.wins[1] += other.wins[1];
        self.draws += other.draws;
    }

    /// Credit every tallied result to `stats` for `mover`.
    pub fn apply_to(&self, stats: &NodeStats, mover: Side) {
        for side in Side::ALL {
            stats.record_n(&Outcome::Winner(side), mover, self.wins[side.index()]);
        }
        stats.record_n(&Outcome::Draw, mover, self.draws);
    }
}

/// Run iterations on `tree` in blocks of `block_size` until `cap` iterations
/// are done or the deadline/cancel token fires. Checks happen before each
/// block, so a cancelled search runs nothing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_blocks(
    tree: &mut MctsTree,
    policy: &dyn SelectionPolicy,
    rave: bool,
    config: &MctsConfig,
    rng: &mut GameRng,
    cap: u32,
    deadline: &Deadline,
    cancel: &CancelToken,
    counters: &Counters,
) -> Tally {
    let mut tally = Tally::default();
    let mut done = 0;
    while done < cap && !deadline.should_stop(cancel) {
        let block = config.block_size.min(cap - done);
        for _ in 0..block {
            let step = iterate(tree, policy, config, rng, rave);
            tally.add(&step.outcome);
            counters.record(&step);
        }
        done += block;
        log::trace!(
            "mcts block done: {done}/{cap} iterations, {} nodes",
            tree.len()
        );
    }
    tally
}

// =============================================================================
// Engine
// =============================================================================

/// Per-move statistics at the root, for display.
#[derive(Clone, Debug, PartialEq)]
pub struct RootVisit {
    pub mv: Move,
    pub visits: u32,
    pub win_rate: f64,
}

/// MCTS search engine.
///
/// Owns the configuration, the rollout RNG and, with `reuse_tree`, the tree
/// carried over from the previous call.
pub struct MctsEngine {
    /// Search configuration (normalized).
    config: MctsConfig,

    /// RNG for rollouts and expansion choices.
    rng: GameRng,

    /// Tree rooted at the position after the last chosen move.
    cache: Option<MctsTree>,

    /// Statistics of the last search.
    stats: SearchStats,

    /// Root children of the last search.
    root_visits: Vec<RootVisit>,
}

impl MctsEngine {
    /// Create a new MCTS engine.
    pub fn new(config: MctsConfig) -> Self {
        let config = config.normalized();
        Self {
            rng: GameRng::new(config.seed),
            config,
            cache: None,
            stats: SearchStats::default(),
            root_visits: Vec::new(),
        }
    }

    /// Choose a move for the side to move.
    ///
    /// Never mutates `position`. Returns a pass outcome when the side to move
    /// has no legal move, `GameOver` on a terminal position and `Cancelled`
    /// when no iteration completed.
    pub fn search(&mut self, position: &Position, cancel: &CancelToken) -> Result<SearchOutcome> {
        self.stats.reset();
        self.root_visits.clear();
        let deadline = Deadline::after(self.config.time_limit());

        if rules::is_terminal(position) {
            self.cache = None;
            return Err(EngineError::GameOver);
        }
        let moves = position.legal_moves();
        if moves.is_empty() {
            self.cache = None;
            return Ok(SearchOutcome::pass(self.stats.clone()));
        }
        if let [only] = moves.as_slice() {
            self.cache = None;
            log::debug!("mcts: single legal move {only}");
            return Ok(SearchOutcome {
                chosen: Some(*only),
                stats: self.stats.clone(),
            });
        }

        let mut tree = self.prepare_tree(position);
        self.stats.reused_visits = tree.root_node().visits();

        let counters = Counters::default();
        let root = tree.root();
        counters.add_expanded(tree.expand(root));

        let variant = self.config.variant;
        let workers = match variant {
            MctsVariant::Sequential => {
                let cap = self.config.iterations;
                run_blocks(
                    &mut tree,
                    &Uct,
                    false,
                    &self.config,
                    &mut self.rng,
                    cap,
                    &deadline,
                    cancel,
                    &counters,
                );
                1
            }
            MctsVariant::Rave => {
                let cap = self.config.iterations;
                run_blocks(
                    &mut tree,
                    &RaveUct,
                    true,
                    &self.config,
                    &mut self.rng,
                    cap,
                    &deadline,
                    cancel,
                    &counters,
                );
                1
            }
            MctsVariant::RootParallel => {
                parallel::root_parallel(
                    &mut tree,
                    &self.config,
                    &mut self.rng,
                    &deadline,
                    cancel,
                    &counters,
                )
            }
            MctsVariant::TreeParallel => {
                parallel::tree_parallel(
                    &mut tree,
                    &self.config,
                    &mut self.rng,
                    &deadline,
                    cancel,
                    &counters,
                )
            }
        };

        counters.write_to(&mut self.stats);
        self.stats.workers = workers;
        self.stats.time_us = deadline.elapsed().as_micros() as u64;
        if counters.iterations() == 0 {
            log::debug!("mcts {variant}: cancelled before any iteration");
            self.cache = None;
            return Err(EngineError::Cancelled);
        }

        let root = tree.root();
        self.root_visits = tree
            .root_node()
            .children
            .iter()
            .filter_map(|&id| {
                let node = tree.get(id);
                node.reached_by.map(|mv| RootVisit {
                    mv,
                    visits: node.visits(),
                    win_rate: node.stats.win_rate(),
                })
            })
            .collect();

        let best = match variant {
            MctsVariant::TreeParallel => best_by_win_rate(&tree, root),
            _ => tree.best_child(root),
        }
        .ok_or(EngineError::Cancelled)?;

        let chosen = tree.get(best);
        let mv = chosen.reached_by.ok_or(EngineError::Cancelled)?;
        self.stats.win_rate = chosen.stats.win_rate();
        self.stats.chosen_visits = chosen.visits();
        self.stats.max_depth = tree.stats().max_depth;

        log::debug!(
            "mcts {variant} chose {mv} (win rate {:.3}, {} visits, {} iterations, {}us)",
            self.stats.win_rate,
            self.stats.chosen_visits,
            self.stats.iterations,
            self.stats.time_us
        );

        self.cache = if self.config.reuse_tree {
            tree.promote(best);
            Some(tree)
        } else {
            None
        };

        Ok(SearchOutcome {
            chosen: Some(mv),
            stats: self.stats.clone(),
        })
    }

    /// Reuse the cached tree if it leads to `position`, else start fresh.
    fn prepare_tree(&mut self, position: &Position) -> MctsTree {
        if !self.config.reuse_tree {
            return MctsTree::new(*position);
        }
        match MctsTree::reuse(self.cache.take(), position) {
            Some(mut tree) => {
                tree.compact_if_sparse();
                log::debug!(
                    "mcts tree reuse hit: {} root visits carried over",
                    tree.root_node().visits()
                );
                tree
            }
            None => {
                log::debug!("mcts tree reuse miss");
                MctsTree::new(*position)
            }
        }
    }

    /// Root children of the last search: move, visits and win rate for the
    /// side playing it.
    #[must_use]
    pub fn root_visits(&self) -> &[RootVisit] {
        &self.root_visits
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The tree kept for the next call, if any.
    #[must_use]
    pub fn cached_tree(&self) -> Option<&MctsTree> {
        self.cache.as_ref()
    }

    /// Forget the carried-over tree.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}

/// Visited child with the highest win rate; ties go to the more visited
/// child.
fn best_by_win_rate(tree: &MctsTree, id: NodeId) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64, u32)> = None;
    for &child in &tree.get(id).children {
        let node = tree.get(child);
        let (rate, visits) = (node.stats.win_rate(), node.visits());
        if visits == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, best_rate, best_visits)) => {
                rate > best_rate || (rate == best_rate && visits > best_visits)
            }
        };
        if better {
            best = Some((child, rate, visits));
        }
    }
    best.map(|(child, _, _)| child)
}
