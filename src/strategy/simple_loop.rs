use std::collections::HashSet;

use unordered_pair::UnorderedPair;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::expr::{BoolExpr, Term};
use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::strategy::{isolated, Strategy};

/// A Hamiltonian cycle through every open cell. Build one with [`LoopBoardBuilder`](crate::LoopBoardBuilder).
#[derive(Clone, Debug)]
pub struct SimpleLoop {
    dims: Dims,
    holes: HashSet<Position>,
    walls: HashSet<UnorderedPair<Position>>,
}

impl SimpleLoop {
    pub(crate) fn new(dims: Dims, holes: HashSet<Position>, walls: HashSet<UnorderedPair<Position>>) -> Self {
        Self { dims, holes, walls }
    }

    pub fn is_open(&self, position: Position) -> bool {
        self.dims.contains(position) && !self.holes.contains(&position)
    }

    pub fn open_count(&self) -> usize {
        self.dims.positions().filter(|p| self.is_open(*p)).count()
    }
}

impl Strategy for SimpleLoop {
    fn name(&self) -> &'static str {
        "simple-loop"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            match self.is_open(position) {
                true => oracle.assert(&edges.degree(position).equals(2)),
                false => oracle.assert(&isolated(edges, position)),
            }
        }

        for UnorderedPair(a, b) in &self.walls {
            if let Some(term) = EdgeKey::between(*a, *b).and_then(|key| edges.get(key)) {
                oracle.assert(&!BoolExpr::from(*term));
            }
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        single_loop(components, self.open_count() == 0, |_| true)
    }
}
