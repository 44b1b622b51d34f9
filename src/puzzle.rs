//! JSON puzzle documents, as handed over by the page reader.
//!
//! A document names its puzzle with a `"puzzle"` tag and carries that puzzle's matrices alongside:
//!
//! ```json
//! {"puzzle": "masyu", "cells": [[null, "white", null], [null, "white", null]], "unique": true}
//! ```

use unordered_pair::UnorderedPair;

use crate::builder::LoopBoardBuilder;
use crate::error::{GridError, PuzzleError};
use crate::location::{Dims, Position};
use crate::solution::Playback;
use crate::solver::{RefinementConfig, SessionStats, SolveSession};
use crate::strategy::{
    Circle, CountryRoad, Detour, DoubleBack, Kuroshiro, Marker, MarkerLoop, Masyu, Pearl, Slitherlink, Strategy, Yajilin,
    YajilinCell,
};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "puzzle", rename_all = "kebab-case")]
pub enum Puzzle {
    MarkerLoop { cells: Vec<Vec<Option<Marker>>> },
    Masyu { cells: Vec<Vec<Option<Pearl>>> },
    SimpleLoop {
        rows: usize,
        cols: usize,
        #[serde(default)]
        holes: Vec<Position>,
        #[serde(default)]
        walls: Vec<(Position, Position)>,
    },
    Yajilin { cells: Vec<Vec<YajilinCell>> },
    Kuroshiro { cells: Vec<Vec<Option<Circle>>> },
    CountryRoad { regions: Vec<Vec<usize>>, clues: Vec<Vec<Option<u32>>> },
    Detour { regions: Vec<Vec<usize>>, clues: Vec<Vec<Option<u32>>> },
    /// `null` regions are holes.
    DoubleBack { regions: Vec<Vec<Option<usize>>> },
    Slitherlink { clues: Vec<Vec<Option<u32>>> },
}

impl Puzzle {
    /// Validate the matrices and build the matching strategy.
    pub fn into_strategy(self) -> Result<Box<dyn Strategy>, GridError> {
        let strategy: Box<dyn Strategy> = match self {
            Puzzle::MarkerLoop { cells } => Box::new(MarkerLoop::new(cells)?),
            Puzzle::Masyu { cells } => Box::new(Masyu::new(cells)?),
            Puzzle::SimpleLoop { rows, cols, holes, walls } => {
                let mut builder = LoopBoardBuilder::with_dims(Dims::new(rows, cols)?);
                for hole in holes {
                    builder.drop_location(hole);
                }
                for (a, b) in walls {
                    builder.disconnect(UnorderedPair(a, b));
                }

                match builder.build() {
                    Ok(board) => Box::new(board),
                    Err(reasons) => return Err(reasons.first().copied().map(GridError::from).unwrap_or(GridError::Empty { rows, cols })),
                }
            }
            Puzzle::Yajilin { cells } => Box::new(Yajilin::new(cells)?),
            Puzzle::Kuroshiro { cells } => Box::new(Kuroshiro::new(cells)?),
            Puzzle::CountryRoad { regions, clues } => Box::new(CountryRoad::new(regions, clues)?),
            Puzzle::Detour { regions, clues } => Box::new(Detour::new(regions, clues)?),
            Puzzle::DoubleBack { regions } => Box::new(DoubleBack::new(regions)?),
            Puzzle::Slitherlink { clues } => Box::new(Slitherlink::new(clues)?),
        };

        Ok(strategy)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub puzzle: Puzzle,
    #[serde(default)]
    pub refinement: RefinementConfig,
    /// Also try to prove the solution unique.
    #[serde(default)]
    pub unique: bool,
}

/// The answer to a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    pub solved: bool,
    /// The solved grid, drawn with box-drawing characters.
    pub rendering: Option<String>,
    pub playback: Option<Playback>,
    /// Whether no other solution exists. Only present when asked for and a solution was found.
    pub unique: Option<bool>,
    pub stats: SessionStats,
}

/// Parse a puzzle document, solve it, and describe the result.
///
/// Malformed documents and matrices are errors; an unsolvable puzzle is a [`Report`] with `solved: false`.
pub fn solve_document(json: &str) -> Result<Report, PuzzleError> {
    let document: Document = serde_json::from_str(json)?;
    let mut session = SolveSession::new(document.puzzle.into_strategy()?)?.with_config(document.refinement);

    let solution = session.solve().cloned();
    let unique = match (&solution, document.unique) {
        (Some(_), true) => Some(session.other_solution().is_none()),
        _ => None,
    };

    Ok(Report {
        solved: solution.is_some(),
        rendering: solution.as_ref().map(|s| s.to_string()),
        playback: solution.as_ref().map(|s| s.playback()),
        unique,
        stats: session.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_are_tagged() {
        let document: Document = serde_json::from_str(r#"{"puzzle": "slitherlink", "clues": [[null, 2]], "unique": true}"#).unwrap();
        assert_eq!(document.puzzle, Puzzle::Slitherlink { clues: vec![vec![None, Some(2)]] });
        assert!(document.unique);
        assert_eq!(document.refinement, RefinementConfig::default());
    }

    #[test]
    fn refinement_overrides() {
        let document: Document = serde_json::from_str(r#"{"puzzle": "double-back", "regions": [[0, null]], "refinement": {"max_iterations": 5}}"#).unwrap();
        assert_eq!(document.refinement.max_iterations, Some(5));
        assert_eq!(document.puzzle, Puzzle::DoubleBack { regions: vec![vec![Some(0), None]] });
    }

    #[test]
    fn bad_documents_are_errors() {
        assert!(matches!(solve_document("{\"puzzle\": \"sudoku\"}"), Err(PuzzleError::Document(_))));
        assert!(matches!(
            solve_document(r#"{"puzzle": "masyu", "cells": [["white"], []]}"#),
            Err(PuzzleError::Grid(GridError::Ragged { row: 1, .. })),
        ));
        assert!(matches!(
            solve_document(r#"{"puzzle": "simple-loop", "rows": 2, "cols": 2, "holes": [[3, 0]]}"#),
            Err(PuzzleError::Grid(GridError::OutOfBounds(Position(3, 0)))),
        ));
    }

    #[test]
    fn hamiltonian_square() {
        let report = solve_document(r#"{"puzzle": "simple-loop", "rows": 2, "cols": 2, "unique": true}"#).unwrap();
        assert!(report.solved);
        assert_eq!(report.rendering.as_deref(), Some("┌┐\n└┘\n"));
        assert_eq!(report.unique, Some(true));
        assert_eq!(report.playback.map(|p| p.strokes.len()), Some(1));
    }

    #[test]
    fn unsolvable_is_not_an_error() {
        let report = solve_document(r#"{"puzzle": "simple-loop", "rows": 1, "cols": 3}"#).unwrap();
        assert!(!report.solved);
        assert_eq!(report.rendering, None);
        assert_eq!(report.unique, None);
    }
}
