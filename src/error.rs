use thiserror::Error;

use crate::location::Position;

/// Malformed grid input. Raised while declaring variables, before any oracle query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },
    #[error("row {row} has {found} cells but row 0 has {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("{what} matrix is {found_rows}x{found_cols} but the grid is {rows}x{cols}")]
    ShapeMismatch { what: &'static str, rows: usize, cols: usize, found_rows: usize, found_cols: usize },
    #[error("position ({}, {}) is outside the grid", .0.0, .0.1)]
    OutOfBounds(Position),
}

/// Failures at the document boundary (JSON in, JSON out).
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("malformed puzzle document: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}
