//! Engine error type.

/// Failures a search call can report.
///
/// A side with no legal move on a live board is not an error: searches
/// report it as a pass (`SearchOutcome::chosen == None`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Neither side can move; the caller should have checked terminality.
    #[error("position is terminal: neither side has a legal move")]
    GameOver,

    /// The search was cancelled before it produced any result.
    #[error("search cancelled before any result was available")]
    Cancelled,

    /// A textual board could not be parsed.
    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EngineError::GameOver.to_string(),
            "position is terminal: neither side has a legal move"
        );
        assert_eq!(
            EngineError::InvalidBoard("too short".into()).to_string(),
            "invalid board: too short"
        );
    }
}
