use std::num::NonZero;

use ndarray::Ix;

use crate::error::GridError;

pub type Coord = usize;
pub type Dimension = NonZero<Coord>;

/// A position `(row, col)` on a grid. The top left corner is `Position(0, 0)`.
///
/// The derived ordering is row-major, which is the "lexicographic" order used to pick a starting point when tracing.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, serde::Serialize, serde::Deserialize)]
pub struct Position(pub Coord, pub Coord);

impl Position {
    #[inline]
    pub fn row(&self) -> Coord {
        self.0
    }

    #[inline]
    pub fn col(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// Offset by `(rows, cols)`. Stepping off the top or left wraps to a huge coordinate which no grid contains.
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Whether `other` is exactly one unit step away along exactly one axis.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1) == 1
    }
}

impl From<(Ix, Ix)> for Position {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

/// Dimensions of a grid, in `(rows, cols)` order. Both are nonzero by construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Dims {
    pub rows: Dimension,
    pub cols: Dimension,
}

impl Dims {
    pub fn new(rows: Coord, cols: Coord) -> Result<Self, GridError> {
        match (NonZero::new(rows), NonZero::new(cols)) {
            (Some(rows), Some(cols)) => Ok(Self { rows, cols }),
            _ => Err(GridError::Empty { rows, cols }),
        }
    }

    #[inline]
    pub fn rows(&self) -> Coord {
        self.rows.get()
    }

    #[inline]
    pub fn cols(&self) -> Coord {
        self.cols.get()
    }

    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.0 < self.rows() && position.1 < self.cols()
    }

    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item=Position> {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |r| (0..cols).map(move |c| Position(r, c)))
    }

    /// The dimensions of the lattice of cell corners, one larger in each direction.
    pub fn corners(&self) -> Self {
        Self {
            rows: self.rows.saturating_add(1),
            cols: self.cols.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dims_rejected() {
        assert!(matches!(Dims::new(0, 3), Err(GridError::Empty { rows: 0, cols: 3 })));
        assert!(Dims::new(1, 1).is_ok());
    }

    #[test]
    fn positions_are_row_major() {
        let dims = Dims::new(2, 2).unwrap();
        assert_eq!(dims.positions().collect::<Vec<_>>(), vec![Position(0, 0), Position(0, 1), Position(1, 0), Position(1, 1)]);
    }

    #[test]
    fn off_grid_offsets_are_not_contained() {
        let dims = Dims::new(3, 3).unwrap();
        assert!(!dims.contains(Position(0, 0).offset_by((-1, 0))));
        assert!(!dims.contains(Position(2, 2).offset_by((0, 1))));
        assert!(Position(1, 1).is_adjacent(&Position(1, 2)));
        assert!(!Position(1, 1).is_adjacent(&Position(2, 2)));
    }
}
