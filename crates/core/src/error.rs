//! Error taxonomy shared by every HelixFlow layer.

/// Result type for evolution operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Errors that can occur while configuring or running experiments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    /// Invalid parameters, rejected before any state is stored
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Unknown experiment or genome id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Command not allowed in the current experiment state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Failure inside a generation cycle
    #[error("Cycle execution failed: {0}")]
    CycleExecution(String),
}

impl EvolutionError {
    /// Whether the orchestrator may retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EvolutionError::CycleExecution(_))
    }
}
