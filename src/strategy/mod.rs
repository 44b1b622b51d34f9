//! Constraint strategies, one per puzzle variant.
//!
//! A strategy decides the lattice the loop is drawn on, asserts its rules over the edge variables,
//! and judges the connected components of each candidate assignment.
//! Everything else (querying, exclusion, tracing) is shared by the [`SolveSession`](crate::SolveSession).

use ndarray::Array2;
use strum::VariantArray;

use crate::acceptance::Verdict;
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::{Model, Oracle};
use crate::shape::Step;

pub use country_road::CountryRoad;
pub use detour::Detour;
pub use double_back::DoubleBack;
pub use kuroshiro::{Circle, Kuroshiro};
pub use marker_loop::{Marker, MarkerLoop};
pub use masyu::{Masyu, Pearl};
pub use simple_loop::SimpleLoop;
pub use slitherlink::Slitherlink;
pub use yajilin::{Yajilin, YajilinCell};

mod country_road;
mod detour;
mod double_back;
mod kuroshiro;
mod marker_loop;
mod masyu;
pub(crate) mod regions;
mod simple_loop;
mod slitherlink;
mod yajilin;

/// Puzzle-specific rules layered on the shared edge model.
pub trait Strategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Dimensions of the grid of positions the loop visits.
    fn lattice(&self) -> Dims;
    /// Declare any extra variables and assert every rule of the puzzle.
    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle);
    /// Acceptance predicate over the components of one candidate assignment.
    fn judge(&self, components: &[Component]) -> Verdict;
    /// Cells to be filled rather than traced, read from an accepted model.
    fn marked(&self, _model: &Model) -> Vec<Position> {
        Vec::new()
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn lattice(&self) -> Dims {
        (**self).lattice()
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        (**self).constrain(edges, oracle)
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        (**self).judge(components)
    }

    fn marked(&self, model: &Model) -> Vec<Position> {
        (**self).marked(model)
    }
}

/// Convert row-major nested vectors into a matrix, rejecting empty and ragged input.
pub fn annotations<T>(rows: Vec<Vec<T>>) -> Result<Array2<T>, GridError> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    Dims::new(height, width)?;

    if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != width) {
        return Err(GridError::Ragged { row, expected: width, found });
    }

    let flat = rows.into_iter().flatten().collect::<Vec<_>>();
    Array2::from_shape_vec((height, width), flat).map_err(|_| GridError::Ragged { row: 0, expected: width, found: 0 })
}

pub(crate) fn dims_of<T>(cells: &Array2<T>) -> Result<Dims, GridError> {
    Dims::new(cells.nrows(), cells.ncols())
}

/// Fail unless `other` has exactly the shape of `dims`.
pub(crate) fn same_shape<T>(what: &'static str, dims: Dims, other: &Array2<T>) -> Result<(), GridError> {
    match other.dim() == (dims.rows(), dims.cols()) {
        true => Ok(()),
        false => Err(GridError::ShapeMismatch {
            what,
            rows: dims.rows(),
            cols: dims.cols(),
            found_rows: other.nrows(),
            found_cols: other.ncols(),
        }),
    }
}

/// The edge leaving `position` in `step`; false off the grid.
pub(crate) fn edge(edges: &EdgeGrid<Term>, position: Position, step: Step) -> BoolExpr {
    edges.toward(position, step).map(|t| BoolExpr::from(*t)).unwrap_or(BoolExpr::FALSE)
}

/// The loop passes straight through `position`. Assumes the degree is at most 2.
pub(crate) fn straight(edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
    BoolExpr::any([
        edge(edges, position, Step::Left).and(edge(edges, position, Step::Right)),
        edge(edges, position, Step::Up).and(edge(edges, position, Step::Down)),
    ])
}

/// The loop turns at `position`. Assumes the degree is at most 2.
pub(crate) fn turns(edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
    BoolExpr::any([Step::Left, Step::Right].into_iter().flat_map(|h| {
        [Step::Up, Step::Down].map(|v| edge(edges, position, h).and(edge(edges, position, v)))
    }))
}

/// The loop touches `position`. Equivalent to "degree is 2" under [`loop_degree`].
pub(crate) fn visited(edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
    BoolExpr::any(Step::VARIANTS.iter().map(|step| edge(edges, position, *step)))
}

/// Degree in `{0, 2}`: the loop either passes through or stays away.
pub(crate) fn loop_degree(edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
    edges.degree(position).in_set(&[0, 2])
}

/// Every edge around `position` is absent.
pub(crate) fn isolated(edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
    BoolExpr::all(Step::VARIANTS.iter().map(|step| !edge(edges, position, *step)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::declare_edge_vars;
    use crate::oracle::{CheckResult, VarisatOracle};

    #[test]
    fn ragged_rows_rejected() {
        assert_eq!(annotations(vec![vec![1, 2], vec![3]]), Err(GridError::Ragged { row: 1, expected: 2, found: 1 }));
        assert_eq!(annotations::<u8>(vec![]), Err(GridError::Empty { rows: 0, cols: 0 }));
        assert_eq!(annotations(vec![Vec::<u8>::new()]), Err(GridError::Empty { rows: 1, cols: 0 }));
        assert_eq!(annotations(vec![vec![1, 2], vec![3, 4]]).unwrap()[(1, 0)], 3);
    }

    #[test]
    fn turn_and_straight_are_exclusive() {
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 3, 3).unwrap();
        let centre = Position(1, 1);
        oracle.assert(&loop_degree(&edges, centre));
        oracle.assert(&turns(&edges, centre));
        oracle.assert(&straight(&edges, centre));
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }

    #[test]
    fn corners_cannot_go_straight() {
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 2, 2).unwrap();
        oracle.assert(&straight(&edges, Position(0, 0)));
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }
}
