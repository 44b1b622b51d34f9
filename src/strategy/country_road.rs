use ndarray::Array2;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, IntExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::strategy::regions::Regions;
use crate::strategy::{annotations, dims_of, loop_degree, same_shape, visited, Strategy};

/// Country Road: one loop visiting every region exactly once.
///
/// A number in a region is how many of its cells the loop visits.
/// Two orthogonally adjacent cells in different regions cannot both be left out.
pub struct CountryRoad {
    dims: Dims,
    regions: Regions,
    clues: Array2<Option<u32>>,
}

impl CountryRoad {
    pub fn new(regions: Vec<Vec<usize>>, clues: Vec<Vec<Option<u32>>>) -> Result<Self, GridError> {
        let regions = annotations(regions)?;
        let dims = dims_of(&regions)?;
        let clues = annotations(clues)?;
        same_shape("clue", dims, &clues)?;

        Ok(Self { dims, regions: Regions::from_dense(&regions), clues })
    }
}

impl Strategy for CountryRoad {
    fn name(&self) -> &'static str {
        "country-road"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            oracle.assert(&loop_degree(edges, position));
        }

        let crossings = self.regions.crossing_constraints(edges, 2);
        if crossings.is_empty() {
            // a single region has no borders to cross; just require some loop
            oracle.assert(&BoolExpr::any(edges.iter().map(|(_, term)| BoolExpr::from(*term))));
        }
        for constraint in &crossings {
            oracle.assert(constraint);
        }

        for (index, clue) in self.clues.indexed_iter() {
            let (Some(clue), Some(region)) = (clue, self.regions.of(Position::from(index))) else {
                continue;
            };
            let visits = self.regions.members(region).into_iter().map(|p| visited(edges, p));
            oracle.assert(&IntExpr::sum(visits).equals(*clue as i64));
        }

        for (a, b) in self.regions.borders(self.dims) {
            oracle.assert(&visited(edges, a).or(visited(edges, b)));
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        single_loop(components, false, |_| true)
    }
}
