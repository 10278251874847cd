//! Strategy selection from configuration.

use serde::{Deserialize, Serialize};

use crate::mcts::{MctsConfig, MctsEngine};
use crate::minimax::{MinimaxConfig, MinimaxSearch};

use super::{RandomStrategy, Strategy};

/// Which strategy to build, with its parameters.
///
/// Tagged by `kind` so front ends can load it from JSON:
/// `{"kind": "mcts", "variant": "root-parallel", "iterations": 5000}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Minimax(MinimaxConfig),
    Mcts(MctsConfig),
    Random { seed: u64 },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Mcts(MctsConfig::default())
    }
}

impl StrategyConfig {
    /// Build the configured strategy.
    #[must_use]
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyConfig::Minimax(config) => Box::new(MinimaxSearch::new(config.clone())),
            StrategyConfig::Mcts(config) => Box::new(MctsEngine::new(config.clone())),
            StrategyConfig::Random { seed } => Box::new(RandomStrategy::new(*seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::mcts::MctsVariant;

    #[test]
    fn test_build_each_kind() {
        let configs = [
            StrategyConfig::Minimax(MinimaxConfig::default().with_depth(2)),
            StrategyConfig::Mcts(
                MctsConfig::default()
                    .with_iterations(50)
                    .with_time_limit(None),
            ),
            StrategyConfig::Random { seed: 1 },
        ];
        for config in configs {
            let mut strategy = config.build();
            let mv = strategy.choose_move(&Position::initial()).unwrap().chosen.unwrap();
            assert!(Position::initial().legal_moves().contains(&mv));
        }
    }

    #[test]
    fn test_from_json() {
        let config: StrategyConfig = serde_json::from_str(
            r#"{"kind": "mcts", "variant": "root-parallel", "iterations": 5000}"#,
        )
        .unwrap();
        match config {
            StrategyConfig::Mcts(mcts) => {
                assert_eq!(mcts.variant, MctsVariant::RootParallel);
                assert_eq!(mcts.iterations, 5000);
            }
            other => panic!("unexpected config: {other:?}"),
        }

        let random: StrategyConfig =
            serde_json::from_str(r#"{"kind": "random", "seed": 3}"#).unwrap();
        assert_eq!(random.build().name(), "random");

        let minimax: StrategyConfig =
            serde_json::from_str(r#"{"kind": "minimax", "depth": 3}"#).unwrap();
        assert_eq!(minimax.build().name(), "minimax(depth 3)");
    }

    #[test]
    fn test_default_is_mcts() {
        assert_eq!(StrategyConfig::default().build().name(), "mcts(sequential)");
    }
}
