use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::Term;
use crate::grid::EdgeGrid;
use crate::location::Dims;
use crate::oracle::Oracle;
use crate::strategy::regions::Regions;
use crate::strategy::{annotations, dims_of, isolated, Strategy};

/// Double Back: a loop through every open cell, visiting each region exactly twice.
pub struct DoubleBack {
    dims: Dims,
    regions: Regions,
}

impl DoubleBack {
    /// `regions` names the region of every cell; [`None`] marks a hole.
    pub fn new(regions: Vec<Vec<Option<usize>>>) -> Result<Self, GridError> {
        let regions = annotations(regions)?;
        Ok(Self { dims: dims_of(&regions)?, regions: Regions::new(regions) })
    }
}

impl Strategy for DoubleBack {
    fn name(&self) -> &'static str {
        "double-back"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            match self.regions.of(position) {
                Some(_) => oracle.assert(&edges.degree(position).equals(2)),
                None => oracle.assert(&isolated(edges, position)),
            }
        }

        for constraint in self.regions.crossing_constraints(edges, 4) {
            oracle.assert(&constraint);
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        single_loop(components, self.regions.ids().is_empty(), |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::declare_edge_vars;
    use crate::oracle::{CheckResult, VarisatOracle};

    #[test]
    fn halves_of_a_square_are_crossed_only_twice() {
        // a 2x2 loop crosses between its two halves twice, not four times
        let mut puzzle = DoubleBack::new(vec![vec![Some(0), Some(0)], vec![Some(1), Some(1)]]).unwrap();
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 2, 2).unwrap();
        puzzle.constrain(&edges, &mut oracle);
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }
}
