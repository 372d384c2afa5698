//! Error types for the coverage engine.
//!
//! The simulation core itself is infallible; errors only arise at the
//! boundary where an obstacle map is read from its interchange format or a
//! caller names an algorithm.

use thiserror::Error;

/// Errors that can occur at the engine boundary.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Map text is not valid JSON
    #[error("Map parse error: {0}")]
    MapParse(#[from] serde_json::Error),

    /// Top level value (or one of its rows) is not an array
    #[error("Map is not an array of arrays")]
    NotAMatrix,

    /// No rows, or rows without cells
    #[error("Map is empty")]
    EmptyMap,

    /// Row length differs from the first row
    #[error("Map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Cell is not the integer 0 or 1
    #[error("Map cell ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidCell {
        row: usize,
        col: usize,
        value: String,
    },

    /// Map does not have the dimension the session expects
    #[error("Map is {rows}x{cols}, expected {expected}x{expected}")]
    WrongDimensions {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// Fine grid cannot be paired with a coarse map
    #[error("Invalid geometry: grid size {grid_size} must be even and non-zero, cell size {cell_size} must be positive")]
    InvalidGeometry { grid_size: usize, cell_size: f64 },

    /// Algorithm name not recognised
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Reading or writing a map file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoverageError {
    /// Creates an invalid-cell error from the offending JSON value.
    pub fn invalid_cell(row: usize, col: usize, value: impl std::fmt::Display) -> Self {
        Self::InvalidCell {
            row,
            col,
            value: value.to_string(),
        }
    }

    /// Returns true if this error came from a malformed map rather than I/O.
    pub fn is_malformed_map(&self) -> bool {
        matches!(
            self,
            Self::MapParse(_)
                | Self::NotAMatrix
                | Self::EmptyMap
                | Self::RaggedRow { .. }
                | Self::InvalidCell { .. }
                | Self::WrongDimensions { .. }
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CoverageError>;
