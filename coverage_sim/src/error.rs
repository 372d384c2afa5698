//! Harness error types.

use coverage_core::CoverageError;
use thiserror::Error;

/// Errors raised by the harness and CLI.
#[derive(Error, Debug)]
pub enum SimError {
    /// Engine-level failure (bad map, bad params, file I/O)
    #[error(transparent)]
    Coverage(#[from] CoverageError),

    /// Scenario name not recognised
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Summary could not be serialised
    #[error("Failed to serialise summary: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Summary file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for harness operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
