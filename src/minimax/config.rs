//! Minimax configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minimax configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    /// Search depth in plies. Passes do not consume depth.
    pub depth: u32,

    /// Wall-clock budget in milliseconds (None = run the full depth).
    /// With a budget, depths are searched iteratively and the deepest
    /// completed iteration wins.
    pub time_limit_ms: Option<u64>,

    /// Sort moves by the static cell-weight table before searching.
    pub move_ordering: bool,

    /// Weight of the mover's disc count in the evaluation.
    pub parity_weight: i32,

    /// Weight of the corner ownership difference in the evaluation.
    pub corner_weight: i32,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            time_limit_ms: None,
            move_ordering: true,
            parity_weight: 1,
            corner_weight: 10,
        }
    }
}

impl MinimaxConfig {
    /// Create a new config with custom depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Create a new config with a time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    /// Create a new config with move ordering on or off.
    pub fn with_move_ordering(mut self, enabled: bool) -> Self {
        self.move_ordering = enabled;
        self
    }

    /// Create a new config with custom evaluation weights.
    pub fn with_weights(mut self, parity: i32, corner: i32) -> Self {
        self.parity_weight = parity;
        self.corner_weight = corner;
        self
    }

    /// Time budget as a duration.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Clamp budgets to at least one unit.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.depth == 0 {
            log::warn!("minimax depth 0 clamped to 1");
            self.depth = 1;
        }
        if self.time_limit_ms == Some(0) {
            log::warn!("minimax time limit 0ms clamped to 1ms");
            self.time_limit_ms = Some(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MinimaxConfig::default();
        assert_eq!(config.depth, 5);
        assert!(config.move_ordering);
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MinimaxConfig::default()
            .with_depth(3)
            .with_move_ordering(false)
            .with_time_limit(Duration::from_millis(250))
            .with_weights(2, 30);

        assert_eq!(config.depth, 3);
        assert!(!config.move_ordering);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
        assert_eq!(config.parity_weight, 2);
        assert_eq!(config.corner_weight, 30);
    }

    #[test]
    fn test_normalized_clamps() {
        let config = MinimaxConfig {
            depth: 0,
            time_limit_ms: Some(0),
            ..MinimaxConfig::default()
        }
        .normalized();

        assert_eq!(config.depth, 1);
        assert_eq!(config.time_limit_ms, Some(1));
    }

    #[test]
    fn test_serialization() {
        let config = MinimaxConfig::default().with_depth(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MinimaxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.depth, 7);
    }
}
