//! Obstacle map interchange format.
//!
//! A map is a JSON array of arrays of the integers 0 and 1. Anything else is
//! rejected with a typed error before it can reach a session.

use crate::error::{CoverageError, Result};
use crate::grid::Grid;
use crate::heatmap::Heatmap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parses a map from JSON text.
///
/// With `expected_dim` set, the map must be exactly `expected_dim` square.
pub fn parse_map(json: &str, expected_dim: Option<usize>) -> Result<Grid> {
    let value: Value = serde_json::from_str(json)?;
    let rows = value.as_array().ok_or(CoverageError::NotAMatrix)?;
    if rows.is_empty() {
        return Err(CoverageError::EmptyMap);
    }

    let mut matrix = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or(CoverageError::NotAMatrix)?;
        let mut parsed = Vec::with_capacity(cells.len());
        for (c, cell) in cells.iter().enumerate() {
            match cell.as_u64() {
                Some(v @ (0 | 1)) => parsed.push(v as u8),
                _ => return Err(CoverageError::invalid_cell(r, c, cell)),
            }
        }
        matrix.push(parsed);
    }

    let grid = Grid::from_rows(matrix)?;

    if let Some(expected) = expected_dim {
        if grid.rows() != expected || grid.cols() != expected {
            return Err(CoverageError::WrongDimensions {
                expected,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
    }

    Ok(grid)
}

/// Serialises a map as pretty-printed JSON rows.
pub fn map_to_json(grid: &Grid) -> String {
    rows_to_json(&grid.to_rows())
}

/// Serialises a heatmap as a binary matrix (`1` = visited).
pub fn heatmap_to_json(heatmap: &Heatmap) -> String {
    rows_to_json(&heatmap.to_binary_rows())
}

fn rows_to_json(rows: &[Vec<u8>]) -> String {
    // Vec<Vec<u8>> always serialises
    serde_json::to_string_pretty(rows).unwrap_or_default()
}

/// Reads and parses a map file.
pub fn load_map(path: impl AsRef<Path>, expected_dim: Option<usize>) -> Result<Grid> {
    let text = fs::read_to_string(path)?;
    parse_map(&text, expected_dim)
}

/// Writes a map file.
pub fn save_map(path: impl AsRef<Path>, grid: &Grid) -> Result<()> {
    fs::write(path, map_to_json(grid))?;
    Ok(())
}

/// Writes a heatmap file in the map format.
pub fn save_heatmap(path: impl AsRef<Path>, heatmap: &Heatmap) -> Result<()> {
    fs::write(path, heatmap_to_json(heatmap))?;
    Ok(())
}
