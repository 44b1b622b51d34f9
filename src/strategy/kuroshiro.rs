use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::acceptance::Verdict;
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, Term};
use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::{Dims, Position};
use crate::oracle::Oracle;
use crate::shape::Step;
use crate::strategy::{annotations, dims_of, loop_degree, Strategy};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Circle {
    Black,
    White,
}

/// Kuroshiro: pair every circle with another by a line.
/// Circles of the same colour are joined straight, circles of different colours with exactly one bend.
pub struct Kuroshiro {
    dims: Dims,
    cells: Array2<Option<Circle>>,
}

impl Kuroshiro {
    pub fn new(cells: Vec<Vec<Option<Circle>>>) -> Result<Self, GridError> {
        let cells = annotations(cells)?;
        Ok(Self { dims: dims_of(&cells)?, cells })
    }

    fn circles(&self) -> Vec<Position> {
        self.cells.indexed_iter()
            .filter(|(_, c)| c.is_some())
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }

    fn circle_at(&self, position: Position) -> Option<Circle> {
        self.cells.get(position.as_index()).copied().flatten()
    }

    /// Walk from `from` in `step` over empty cells.
    /// Returns the empty cells passed and the first non-empty cell reached, if any.
    fn walk(&self, from: Position, step: Step) -> (Vec<Position>, Option<Position>) {
        let mut passed = Vec::new();
        let mut at = step.attempt_from(from);
        while self.dims.contains(at) {
            if self.circle_at(at).is_some() {
                return (passed, Some(at));
            }
            passed.push(at);
            at = step.attempt_from(at);
        }
        (passed, None)
    }

    /// Every way to join the circle at `from` to a partner, as the positions visited in order.
    pub(crate) fn candidates(&self, from: Position) -> Vec<Vec<Position>> {
        let Some(colour) = self.circle_at(from) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for step in Step::VARIANTS {
            let (run, stop) = self.walk(from, *step);

            if let Some(partner) = stop.filter(|p| self.circle_at(*p) == Some(colour)) {
                found.push([from].into_iter().chain(run.iter().copied()).chain([partner]).collect_vec());
            }

            for (i, corner) in run.iter().enumerate() {
                for turn in step.perpendicular() {
                    let (leg, stop) = self.walk(*corner, turn);
                    let Some(partner) = stop.filter(|p| self.circle_at(*p).is_some_and(|c| c != colour)) else {
                        continue;
                    };

                    found.push([from].into_iter()
                        .chain(run[..=i].iter().copied())
                        .chain(leg)
                        .chain([partner])
                        .collect_vec());
                }
            }
        }

        found
    }

    fn path_active(edges: &EdgeGrid<Term>, path: &[Position]) -> BoolExpr {
        BoolExpr::all(path.iter().tuple_windows().map(|(a, b)| {
            EdgeKey::between(*a, *b)
                .and_then(|key| edges.get(key))
                .map(|term| BoolExpr::from(*term))
                .unwrap_or(BoolExpr::FALSE)
        }))
    }
}

impl Strategy for Kuroshiro {
    fn name(&self) -> &'static str {
        "kuroshiro"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        for position in self.dims.positions() {
            if self.circle_at(position).is_none() {
                oracle.assert(&loop_degree(edges, position));
                continue;
            }

            oracle.assert(&edges.degree(position).equals(1));
            let joined = self.candidates(position).into_iter().map(|path| Self::path_active(edges, &path));
            oracle.assert(&BoolExpr::any(joined));
        }
    }

    /// Paths always end at circles, so only a cycle can lack one, and cycles are never part of the answer.
    fn judge(&self, components: &[Component]) -> Verdict {
        let circles = self.circles();
        let stray = components.iter()
            .filter(|c| !circles.iter().any(|p| c.contains(p)))
            .map(|c| c.edges.clone())
            .collect_vec();

        match (stray.is_empty(), components.is_empty() && !circles.is_empty()) {
            (_, true) => Verdict::Reject(Vec::new()),
            (true, false) => Verdict::Accept,
            (false, false) => Verdict::Reject(stray),
        }
    }
}
