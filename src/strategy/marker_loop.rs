use itertools::Itertools;
use ndarray::Array2;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::Term;
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::strategy::{annotations, dims_of, loop_degree, straight, turns, Strategy};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// The loop passes through and turns here.
    Turn,
    /// The loop passes straight through here.
    Straight,
}

/// A loop through some cells, with turn/straight markers and no other clues.
pub struct MarkerLoop {
    dims: Dims,
    cells: Array2<Option<Marker>>,
}

impl MarkerLoop {
    pub fn new(cells: Vec<Vec<Option<Marker>>>) -> Result<Self, GridError> {
        let cells = annotations(cells)?;
        Ok(Self { dims: dims_of(&cells)?, cells })
    }

    fn markers(&self) -> Vec<Position> {
        self.cells.indexed_iter()
            .filter(|(_, m)| m.is_some())
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }
}

impl Strategy for MarkerLoop {
    fn name(&self) -> &'static str {
        "marker-loop"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            oracle.assert(&loop_degree(edges, position));
            match self.cells[position.as_index()] {
                Some(Marker::Turn) => oracle.assert(&turns(edges, position)),
                Some(Marker::Straight) => oracle.assert(&straight(edges, position)),
                None => {}
            }
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        let markers = self.markers();
        single_loop(components, markers.is_empty(), |c| c.covers(markers.iter()))
    }
}
