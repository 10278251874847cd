//! Parallel MCTS drivers.
//!
//! - Root-parallel: workers share one tree behind an `RwLock`. Select and
//!   expand take the write lock. Backpropagation takes the read lock and
//!   updates atomic counters, so backpropagations never wait on each other.
//!   They do wait while another worker holds the write lock: expansion can
//!   grow the arena `Vec`, so node addresses are only stable under a lock.
//! - Tree-parallel: the root is expanded once and every root child is
//!   searched as a private subtree. Subtrees advance in rounds of one block
//!   each, so every root move is searched before any subtree gets a second
//!   block. Results are grafted back under the root when the rounds end.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::core::{CancelToken, Deadline, GameRng};

use super::config::MctsConfig;
use super::policy::{simulate, Uct};
use super::search::{run_blocks, Counters, Step, Tally};
use super::tree::MctsTree;

/// Run `op` on a dedicated pool of `workers` threads, or on the global pool
/// if one cannot be built.
fn with_pool<R: Send>(workers: usize, op: impl FnOnce() -> R + Send) -> R {
    match ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("reversi-mcts-{idx}"))
        .build()
    {
        Ok(pool) => pool.install(op),
        Err(err) => {
            log::warn!("could not build mcts thread pool, using the global pool: {err}");
            op()
        }
    }
}

/// Root-parallel search over a shared tree. Returns the worker count.
pub(crate) fn root_parallel(
    tree: &mut MctsTree,
    config: &MctsConfig,
    rng: &mut GameRng,
    deadline: &Deadline,
    cancel: &CancelToken,
    counters: &Counters,
) -> usize {
    let workers = config.workers.max(1);
    let placeholder = MctsTree::with_capacity(tree.root_node().position, 1);
    let shared = RwLock::new(std::mem::replace(tree, placeholder));
    let claimed = AtomicU32::new(0);
    let rngs: Vec<GameRng> = (0..workers).map(|_| rng.fork()).collect();

    {
        let shared = &shared;
        let claimed = &claimed;
        with_pool(workers, || {
            rayon::scope(|s| {
                for mut worker_rng in rngs {
                    s.spawn(move |_| loop {
                        if deadline.should_stop(cancel)
                            || claimed.fetch_add(1, Ordering::Relaxed) >= config.iterations
                        {
                            break;
                        }

                        let (node, position, expanded) = {
                            let mut tree = shared.write().unwrap_or_else(PoisonError::into_inner);
                            let leaf = tree.select(tree.root(), &Uct, config);
                            let (node, expanded) =
                                tree.expand_and_pick(leaf, config.max_nodes, &mut worker_rng);
                            (node, tree.get(node).position, expanded)
                        };

                        let rollout = simulate(&position, &mut worker_rng);
                        shared
                            .read()
                            .unwrap_or_else(PoisonError::into_inner)
                            .backpropagate(node, &rollout.outcome);

                        counters.record(&Step {
                            outcome: rollout.outcome,
                            plies: rollout.plies,
                            expanded,
                        });
                    });
                }
            });
        });
    }

    *tree = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    log::trace!(
        "root-parallel: {} iterations over {workers} workers",
        counters.iterations()
    );
    workers
}

/// Split an iteration cap into `parts` shares that sum to exactly `cap`.
/// The first `cap % parts` shares get one extra iteration.
fn split_cap(cap: u32, parts: u32) -> Vec<u32> {
    let (share, extra) = (cap / parts, cap % parts);
    (0..parts).map(|i| share + u32::from(i < extra)).collect()
}

/// One root child searched as a private subtree.
struct Subtree {
    tree: MctsTree,
    rng: GameRng,
    quota: u32,
    tally: Tally,
}

impl Subtree {
    fn remaining(&self) -> u32 {
        self.quota - self.tally.total()
    }

    /// Run at most one block. Returns the iterations run.
    fn advance(
        &mut self,
        config: &MctsConfig,
        deadline: &Deadline,
        cancel: &CancelToken,
        counters: &Counters,
    ) -> u32 {
        let cap = config.block_size.min(self.remaining());
        let tally = run_blocks(
            &mut self.tree,
            &Uct,
            false,
            config,
            &mut self.rng,
            cap,
            deadline,
            cancel,
            counters,
        );
        self.tally.merge(&tally);
        tally.total()
    }
}

/// Tree-parallel search: one private subtree per root child.
///
/// The iteration cap is split across the subtrees. The first round ignores
/// the clock so that every root move gets at least one block. Returns the
/// worker count.
pub(crate) fn tree_parallel(
    tree: &mut MctsTree,
    config: &MctsConfig,
    rng: &mut GameRng,
    deadline: &Deadline,
    cancel: &CancelToken,
    counters: &Counters,
) -> usize {
    let root = tree.root();
    let children = tree.root_node().children.clone();
    if children.is_empty() {
        return 0;
    }
    let workers = config.workers.clamp(1, children.len());

    let mut subtrees: Vec<Subtree> = children
        .iter()
        .zip(split_cap(config.iterations, children.len() as u32))
        .map(|(&child, quota)| Subtree {
            tree: tree.extract(child),
            rng: rng.fork(),
            quota,
            tally: Tally::default(),
        })
        .collect();

    let first_round = Deadline::unbounded();
    let mut rounds = 0u32;
    with_pool(workers, || loop {
        let clock = if rounds == 0 { &first_round } else { deadline };
        if clock.should_stop(cancel) {
            break;
        }
        let ran: u32 = subtrees
            .par_iter_mut()
            .filter(|subtree| subtree.remaining() > 0)
            .map(|subtree| subtree.advance(config, clock, cancel, counters))
            .sum();
        if ran == 0 {
            break;
        }
        rounds += 1;
    });

    let mover = tree.root_node().mover();
    for (slot, subtree) in subtrees.into_iter().enumerate() {
        subtree.tally.apply_to(&tree.root_node().stats, mover);
        tree.graft(root, slot, subtree.tree);
    }
    log::trace!(
        "tree-parallel: {} subtrees, {rounds} rounds over {workers} workers",
        children.len()
    );
    workers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::mcts::config::MctsVariant;

    fn config(variant: MctsVariant, iterations: u32) -> MctsConfig {
        MctsConfig::default()
            .with_variant(variant)
            .with_iterations(iterations)
            .with_time_limit(None)
            .with_workers(3)
            .normalized()
    }

    fn expanded_root() -> (MctsTree, Counters) {
        let mut tree = MctsTree::new(Position::initial());
        let counters = Counters::default();
        counters.add_expanded(tree.expand(tree.root()));
        (tree, counters)
    }

    #[test]
    fn test_root_parallel_runs_iteration_cap() {
        let (mut tree, counters) = expanded_root();
        let config = config(MctsVariant::RootParallel, 300);
        let mut rng = GameRng::new(1);

        let workers = root_parallel(
            &mut tree,
            &config,
            &mut rng,
            &Deadline::unbounded(),
            &CancelToken::new(),
            &counters,
        );

        assert_eq!(workers, 3);
        assert_eq!(counters.iterations(), 300);
        let child_visits: u32 = tree
            .root_node()
            .children
            .iter()
            .map(|&c| tree.get(c).visits())
            .sum();
        assert_eq!(tree.root_node().visits(), 300);
        assert_eq!(child_visits, 300);
    }

    #[test]
    fn test_root_parallel_cancelled() {
        let (mut tree, counters) = expanded_root();
        let config = config(MctsVariant::RootParallel, 300);
        let cancel = CancelToken::new();
        cancel.cancel();

        root_parallel(
            &mut tree,
            &config,
            &mut GameRng::new(1),
            &Deadline::unbounded(),
            &cancel,
            &counters,
        );
        assert_eq!(counters.iterations(), 0);
        assert_eq!(tree.root_node().visits(), 0);
    }

    #[test]
    fn test_tree_parallel_grafts_subtrees() {
        let (mut tree, counters) = expanded_root();
        let config = config(MctsVariant::TreeParallel, 400);
        let mut rng = GameRng::new(2);

        let workers = tree_parallel(
            &mut tree,
            &config,
            &mut rng,
            &Deadline::unbounded(),
            &CancelToken::new(),
            &counters,
        );

        assert_eq!(workers, 3);
        assert_eq!(counters.iterations(), 400);
        let root = tree.root();
        assert_eq!(tree.root_node().visits(), 400);
        for &child in &tree.root_node().children {
            let node = tree.get(child);
            assert_eq!(node.parent, root);
            assert_eq!(node.depth, 1);
            assert_eq!(node.visits(), 100);
            assert!(!node.is_leaf());
        }
    }

    #[test]
    fn test_split_cap_sums_to_cap() {
        assert_eq!(split_cap(5, 4), vec![2, 1, 1, 1]);
        assert_eq!(split_cap(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(split_cap(400, 4), vec![100; 4]);
    }

    #[test]
    fn test_tree_parallel_never_exceeds_cap() {
        let (mut tree, counters) = expanded_root();
        let config = config(MctsVariant::TreeParallel, 5);

        tree_parallel(
            &mut tree,
            &config,
            &mut GameRng::new(4),
            &Deadline::unbounded(),
            &CancelToken::new(),
            &counters,
        );

        assert_eq!(counters.iterations(), 5);
        assert_eq!(tree.root_node().visits(), 5);
        let visits: Vec<u32> = tree
            .root_node()
            .children
            .iter()
            .map(|&c| tree.get(c).visits())
            .collect();
        assert_eq!(visits, vec![2, 1, 1, 1]);
    }

    /// A single worker under a time budget still searches every root move.
    #[test]
    fn test_tree_parallel_deadline_reaches_every_child() {
        let (mut tree, counters) = expanded_root();
        let config = config(MctsVariant::TreeParallel, u32::MAX).with_workers(1);

        tree_parallel(
            &mut tree,
            &config,
            &mut GameRng::new(5),
            &Deadline::after(Some(std::time::Duration::from_millis(20))),
            &CancelToken::new(),
            &counters,
        );

        assert_eq!(tree.root_node().children.len(), 4);
        for &child in &tree.root_node().children {
            assert!(tree.get(child).visits() > 0);
        }
        assert_eq!(tree.root_node().visits(), counters.iterations());
    }

    #[test]
    fn test_tree_parallel_cancelled() {
        let (mut tree, counters) = expanded_root();
        let cancel = CancelToken::new();
        cancel.cancel();

        tree_parallel(
            &mut tree,
            &config(MctsVariant::TreeParallel, 300),
            &mut GameRng::new(6),
            &Deadline::unbounded(),
            &cancel,
            &counters,
        );
        assert_eq!(counters.iterations(), 0);
        assert_eq!(tree.root_node().visits(), 0);
    }
}
