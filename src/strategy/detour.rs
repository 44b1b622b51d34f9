use ndarray::Array2;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{IntExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::strategy::regions::Regions;
use crate::strategy::{annotations, dims_of, same_shape, turns, Strategy};

/// Detour: a loop through every cell, turning exactly as often in each region as its number says.
pub struct Detour {
    dims: Dims,
    regions: Regions,
    clues: Array2<Option<u32>>,
}

impl Detour {
    pub fn new(regions: Vec<Vec<usize>>, clues: Vec<Vec<Option<u32>>>) -> Result<Self, GridError> {
        let regions = annotations(regions)?;
        let dims = dims_of(&regions)?;
        let clues = annotations(clues)?;
        same_shape("clue", dims, &clues)?;

        Ok(Self { dims, regions: Regions::from_dense(&regions), clues })
    }
}

impl Strategy for Detour {
    fn name(&self) -> &'static str {
        "detour"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            oracle.assert(&edges.degree(position).equals(2));
        }

        for (index, clue) in self.clues.indexed_iter() {
            let (Some(clue), Some(region)) = (clue, self.regions.of(Position::from(index))) else {
                continue;
            };
            let turning = self.regions.members(region).into_iter().map(|p| turns(edges, p));
            oracle.assert(&IntExpr::sum(turning).equals(*clue as i64));
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        single_loop(components, false, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::declare_edge_vars;
    use crate::oracle::{CheckResult, VarisatOracle};

    #[test]
    fn every_cell_of_a_square_turns() {
        let mut puzzle = Detour::new(vec![vec![0, 0], vec![0, 0]], vec![vec![Some(3), None], vec![None, None]]).unwrap();
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 2, 2).unwrap();
        puzzle.constrain(&edges, &mut oracle);
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }
}
