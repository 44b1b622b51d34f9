use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::error::GridError;
use crate::expr::{IntExpr, Term};
use crate::location::{Coord, Dims, Position};
use crate::oracle::{Model, Oracle};
use crate::shape::Step;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Between `(r, c)` and `(r, c + 1)`.
    H,
    /// Between `(r, c)` and `(r + 1, c)`.
    V,
}

/// Canonical name of an edge: its kind and the coordinates of its upper-left endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct EdgeKey {
    pub kind: EdgeKind,
    pub row: Coord,
    pub col: Coord,
}

impl EdgeKey {
    pub fn h(row: Coord, col: Coord) -> Self {
        Self { kind: EdgeKind::H, row, col }
    }

    pub fn v(row: Coord, col: Coord) -> Self {
        Self { kind: EdgeKind::V, row, col }
    }

    /// The edge joining `a` and `b`, if they are orthogonal neighbours.
    pub fn between(a: Position, b: Position) -> Option<Self> {
        let step = Step::direction_to(a, b)?;
        Some(Self::leaving(a, step))
    }

    /// The edge taken by stepping from `position` in `step`. It may lie outside any particular grid.
    pub fn leaving(position: Position, step: Step) -> Self {
        // backward steps are stored at the neighbour
        let origin = match step.is_forward() {
            true => position,
            false => step.attempt_from(position),
        };
        match step.is_horizontal() {
            true => Self::h(origin.0, origin.1),
            false => Self::v(origin.0, origin.1),
        }
    }

    pub fn endpoints(&self) -> UnorderedPair<Position> {
        let origin = Position(self.row, self.col);
        let other = match self.kind {
            EdgeKind::H => Step::Right.attempt_from(origin),
            EdgeKind::V => Step::Down.attempt_from(origin),
        };
        UnorderedPair(origin, other)
    }
}

impl Display for EdgeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}[{}][{}]", self.kind, self.row, self.col)
    }
}

/// One handle per potential loop segment between orthogonally adjacent grid positions.
///
/// `h` is `rows × (cols - 1)` and `v` is `(rows - 1) × cols`.
/// There are no "left" or "up" handles; a position reads its neighbour's handle for those sides.
/// During modelling the handles are oracle [`Term`]s, after solving they are `bool`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeGrid<T> {
    pub(crate) dims: Dims,
    pub(crate) h: Array2<T>,
    pub(crate) v: Array2<T>,
}

impl<T> EdgeGrid<T> {
    pub fn from_fn(dims: Dims, mut f: impl FnMut(EdgeKey) -> T) -> Self {
        let h = Array2::from_shape_fn((dims.rows(), dims.cols() - 1), |(r, c)| f(EdgeKey::h(r, c)));
        let v = Array2::from_shape_fn((dims.rows() - 1, dims.cols()), |(r, c)| f(EdgeKey::v(r, c)));
        Self { dims, h, v }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn get(&self, key: EdgeKey) -> Option<&T> {
        match key.kind {
            EdgeKind::H => self.h.get((key.row, key.col)),
            EdgeKind::V => self.v.get((key.row, key.col)),
        }
    }

    /// The handle for the edge leaving `position` in `step`, or [`None`] at the border.
    pub fn toward(&self, position: Position, step: Step) -> Option<&T> {
        if !self.dims.contains(position) || !self.dims.contains(step.attempt_from(position)) {
            return None;
        }
        self.get(EdgeKey::leaving(position, step))
    }

    /// Handles around `position`, in [`Step`] priority order.
    pub fn incident(&self, position: Position) -> Vec<(Step, &T)> {
        <Step as strum::VariantArray>::VARIANTS.iter()
            .filter_map(|step| self.toward(position, *step).map(|handle| (*step, handle)))
            .collect_vec()
    }

    /// Every edge with its handle, horizontal edges first, each in row-major order.
    pub fn iter(&self) -> impl Iterator<Item=(EdgeKey, &T)> + '_ {
        self.h.indexed_iter().map(|((r, c), t)| (EdgeKey::h(r, c), t))
            .chain(self.v.indexed_iter().map(|((r, c), t)| (EdgeKey::v(r, c), t)))
    }

    pub fn len(&self) -> usize {
        self.h.len() + self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map<U>(&self, mut f: impl FnMut(EdgeKey, &T) -> U) -> EdgeGrid<U> {
        EdgeGrid {
            dims: self.dims,
            h: Array2::from_shape_fn(self.h.raw_dim(), |(r, c)| f(EdgeKey::h(r, c), &self.h[(r, c)])),
            v: Array2::from_shape_fn(self.v.raw_dim(), |(r, c)| f(EdgeKey::v(r, c), &self.v[(r, c)])),
        }
    }
}

impl EdgeGrid<Term> {
    /// Sum of the edge variables around `position`.
    pub fn degree(&self, position: Position) -> IntExpr {
        IntExpr::sum(self.incident(position).into_iter().map(|(_, term)| *term))
    }

    /// Read every edge out of a satisfying model.
    pub fn resolve(&self, model: &Model) -> EdgeGrid<bool> {
        self.map(|_, term| model.value(*term))
    }
}

impl EdgeGrid<bool> {
    pub fn degree(&self, position: Position) -> usize {
        self.incident(position).into_iter().filter(|(_, active)| **active).count()
    }

    pub fn is_active(&self, key: EdgeKey) -> bool {
        self.get(key).copied().unwrap_or(false)
    }

    pub fn active(&self) -> impl Iterator<Item=EdgeKey> + '_ {
        self.iter().filter(|(_, active)| **active).map(|(key, _)| key)
    }

    /// Steps leading out of `position` along active edges.
    pub fn exits(&self, position: Position) -> Vec<Step> {
        self.incident(position).into_iter().filter(|(_, active)| **active).map(|(step, _)| step).collect_vec()
    }
}

/// Declare one 0/1 oracle variable per edge of a `rows × cols` grid.
pub fn declare_edge_vars(oracle: &mut dyn Oracle, rows: usize, cols: usize) -> Result<EdgeGrid<Term>, GridError> {
    let dims = Dims::new(rows, cols)?;
    Ok(EdgeGrid::from_fn(dims, |key| oracle.declare_var(&key.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::VarisatOracle;

    #[test]
    fn shapes() {
        let grid = EdgeGrid::from_fn(Dims::new(2, 3).unwrap(), |key| key);
        assert_eq!(grid.h.dim(), (2, 2));
        assert_eq!(grid.v.dim(), (1, 3));
        assert_eq!(grid.len(), 7);
    }

    #[test]
    fn neighbours_share_handles() {
        let grid = EdgeGrid::from_fn(Dims::new(3, 3).unwrap(), |key| key);
        assert_eq!(grid.toward(Position(1, 1), Step::Left), grid.toward(Position(1, 0), Step::Right));
        assert_eq!(grid.toward(Position(1, 1), Step::Up), Some(&EdgeKey::v(0, 1)));
        assert_eq!(grid.toward(Position(0, 0), Step::Up), None);
        assert_eq!(grid.toward(Position(2, 2), Step::Right), None);
        assert_eq!(grid.incident(Position(0, 0)).len(), 2);
        assert_eq!(grid.incident(Position(1, 1)).len(), 4);
    }

    #[test]
    fn keys_and_endpoints_agree() {
        let a = Position(2, 1);
        let b = Position(1, 1);
        let key = EdgeKey::between(a, b).unwrap();
        assert_eq!(key, EdgeKey::v(1, 1));
        assert_eq!(key.endpoints(), UnorderedPair(b, a));
        assert_eq!(EdgeKey::between(a, Position(0, 0)), None);
    }

    #[test]
    fn single_cell_grid_has_no_edges() {
        let mut oracle = VarisatOracle::new();
        let grid = declare_edge_vars(&mut oracle, 1, 1).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.degree(Position(0, 0)).width(), 0);
    }

    #[test]
    fn zero_sized_grid_fails_fast() {
        let mut oracle = VarisatOracle::new();
        assert!(matches!(declare_edge_vars(&mut oracle, 0, 4), Err(GridError::Empty { .. })));
        assert_eq!(oracle.var_count(), 0);
    }

    #[test]
    fn names_follow_keys() {
        let mut oracle = VarisatOracle::new();
        let grid = declare_edge_vars(&mut oracle, 2, 2).unwrap();
        let term = *grid.get(EdgeKey::v(0, 1)).unwrap();
        assert_eq!(oracle.name_of(term), Some("V[0][1]"));
    }
}
