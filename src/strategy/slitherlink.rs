use itertools::Itertools;
use ndarray::Array2;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, IntExpr, Term};
use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::strategy::{annotations, dims_of, loop_degree, Strategy};

/// Slitherlink: a loop along cell sides, with each number counting the sides of its cell on the loop.
///
/// The loop runs on the lattice of cell corners, so a `rows × cols` puzzle has a `(rows + 1) × (cols + 1)` lattice.
pub struct Slitherlink {
    dims: Dims,
    clues: Array2<Option<u32>>,
}

impl Slitherlink {
    pub fn new(clues: Vec<Vec<Option<u32>>>) -> Result<Self, GridError> {
        let clues = annotations(clues)?;
        Ok(Self { dims: dims_of(&clues)?, clues })
    }

    /// The four lattice edges around cell `position`: top, bottom, left, right.
    pub fn sides(position: Position) -> [EdgeKey; 4] {
        let Position(r, c) = position;
        [EdgeKey::h(r, c), EdgeKey::h(r + 1, c), EdgeKey::v(r, c), EdgeKey::v(r, c + 1)]
    }

    fn positive_clues(&self) -> Vec<Position> {
        self.clues.indexed_iter()
            .filter(|(_, clue)| clue.is_some_and(|n| n > 0))
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }
}

impl Strategy for Slitherlink {
    fn name(&self) -> &'static str {
        "slitherlink"
    }

    fn lattice(&self) -> Dims {
        self.dims.corners()
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for corner in self.lattice().positions() {
            oracle.assert(&loop_degree(edges, corner));
        }

        for (index, clue) in self.clues.indexed_iter() {
            let Some(clue) = clue else {
                continue;
            };
            let sides = Self::sides(Position::from(index)).map(|key| {
                edges.get(key).map(|term| BoolExpr::from(*term)).unwrap_or(BoolExpr::FALSE)
            });
            oracle.assert(&IntExpr::sum(sides).equals(*clue as i64));
        }
    }

    /// A loop which misses a positive clue is never part of the answer.
    fn judge(&self, components: &[Component]) -> Verdict {
        let clues = self.positive_clues();
        single_loop(components, clues.is_empty(), |c| clues.iter().all(|p| c.touches_any(&Self::sides(*p))))
    }
}
