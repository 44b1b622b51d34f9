use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::shape::Step;
use crate::strategy::{annotations, dims_of, edge, loop_degree, straight, turns, Strategy};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pearl {
    /// Turn here, and go straight through the next cell on both sides.
    Black,
    /// Go straight through here, and turn in at least one of the next cells.
    White,
}

/// Masyu: a single loop through every pearl.
pub struct Masyu {
    dims: Dims,
    cells: Array2<Option<Pearl>>,
}

impl Masyu {
    pub fn new(cells: Vec<Vec<Option<Pearl>>>) -> Result<Self, GridError> {
        let cells = annotations(cells)?;
        Ok(Self { dims: dims_of(&cells)?, cells })
    }

    fn pearls(&self) -> Vec<Position> {
        self.cells.indexed_iter()
            .filter(|(_, p)| p.is_some())
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }

    fn turns_at(&self, edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
        match self.dims.contains(position) {
            true => turns(edges, position),
            false => BoolExpr::FALSE,
        }
    }

    fn black(&self, edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
        let extensions = Step::VARIANTS.iter().map(|step| {
            let next = step.attempt_from(position);
            let onward = match self.dims.contains(next) {
                true => edge(edges, next, *step),
                false => BoolExpr::FALSE,
            };
            // leaving this way means carrying on one more cell in the same direction
            edge(edges, position, *step).implies(onward)
        });

        turns(edges, position).and(BoolExpr::all(extensions))
    }

    fn white(&self, edges: &EdgeGrid<Term>, position: Position) -> BoolExpr {
        let axis = |a: Step, b: Step| {
            edge(edges, position, a)
                .and(edge(edges, position, b))
                .and(self.turns_at(edges, a.attempt_from(position)).or(self.turns_at(edges, b.attempt_from(position))))
        };

        BoolExpr::any([axis(Step::Left, Step::Right), axis(Step::Up, Step::Down)])
    }
}

impl Strategy for Masyu {
    fn name(&self) -> &'static str {
        "masyu"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            oracle.assert(&loop_degree(edges, position));
            match self.cells[position.as_index()] {
                Some(Pearl::Black) => oracle.assert(&self.black(edges, position)),
                Some(Pearl::White) => {
                    oracle.assert(&straight(edges, position));
                    oracle.assert(&self.white(edges, position));
                }
                None => {}
            }
        }
    }

    /// Every pearl must be on the one loop; a loop elsewhere on the board proves nothing.
    fn judge(&self, components: &[Component]) -> Verdict {
        let pearls = self.pearls();
        single_loop(components, pearls.is_empty(), |c| c.covers(pearls.iter()))
    }
}
