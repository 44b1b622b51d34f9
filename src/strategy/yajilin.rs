use itertools::Itertools;
use ndarray::Array2;

use crate::acceptance::{single_loop, Verdict};
use crate::connectivity::Component;
use crate::error::GridError;
use crate::expr::{BoolExpr, IntExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};
use crate::oracle::{Model, Oracle};
use crate::shape::Step;
use crate::strategy::{annotations, dims_of, isolated, Strategy};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YajilinCell {
    /// Either shaded or on the loop.
    Empty,
    /// Exactly `count` shaded cells lie in `direction` from here.
    Clue { direction: Step, count: u32 },
}

/// Yajilin: shade some cells, loop through all the rest.
pub struct Yajilin {
    dims: Dims,
    cells: Array2<YajilinCell>,
    /// Shading variable of each empty cell, declared by `constrain`.
    shades: Array2<Option<Term>>,
}

impl Yajilin {
    pub fn new(cells: Vec<Vec<YajilinCell>>) -> Result<Self, GridError> {
        let cells = annotations(cells)?;
        let shades = Array2::from_elem(cells.raw_dim(), None);
        Ok(Self { dims: dims_of(&cells)?, cells, shades })
    }

    fn shade_of(&self, position: Position) -> Option<Term> {
        self.shades.get(position.as_index()).copied().flatten()
    }

    /// Positions strictly beyond `from` in `direction`, up to the border.
    fn ray(&self, from: Position, direction: Step) -> Vec<Position> {
        let mut cells = Vec::new();
        let mut at = direction.attempt_from(from);
        while self.dims.contains(at) {
            cells.push(at);
            at = direction.attempt_from(at);
        }
        cells
    }
}

impl Strategy for Yajilin {
    fn name(&self) -> &'static str {
        "yajilin"
    }

    fn lattice(&self) -> Dims {
        self.dims
    }

    fn constrain(&mut self, edges: &EdgeGrid<Term>, oracle: &mut dyn Oracle) {
        let cells = &self.cells;
        self.shades = Array2::from_shape_fn(cells.raw_dim(), |(r, c)| match cells[(r, c)] {
            YajilinCell::Empty => Some(oracle.declare_var(&format!("shade[{r}][{c}]"))),
            YajilinCell::Clue { .. } => None,
        });

        for position in self.dims.positions() {
            match (self.cells[position.as_index()], self.shade_of(position)) {
                (YajilinCell::Empty, Some(shade)) => {
                    let shaded = BoolExpr::from(shade);
                    let degree = edges.degree(position);
                    oracle.assert(&BoolExpr::any([
                        shaded.clone().and(degree.clone().equals(0)),
                        (!shaded).and(degree.equals(2)),
                    ]));

                    for step in Step::FORWARD_VARIANTS {
                        if let Some(other) = self.shade_of(step.attempt_from(position)) {
                            oracle.assert(&!(BoolExpr::from(shade).and(BoolExpr::from(other))));
                        }
                    }
                }
                (YajilinCell::Clue { direction, count }, _) => {
                    oracle.assert(&isolated(edges, position));
                    let shaded = self.ray(position, direction).into_iter().filter_map(|p| self.shade_of(p));
                    oracle.assert(&IntExpr::sum(shaded).equals(count as i64));
                }
                (YajilinCell::Empty, None) => {}
            }
        }
    }

    fn judge(&self, components: &[Component]) -> Verdict {
        single_loop(components, true, |_| true)
    }

    fn marked(&self, model: &Model) -> Vec<Position> {
        self.shades.indexed_iter()
            .filter(|(_, shade)| shade.is_some_and(|term| model.value(term)))
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::declare_edge_vars;
    use crate::oracle::{CheckResult, VarisatOracle};

    #[test]
    fn clue_counts_shaded_cells_along_the_arrow() {
        let clue = YajilinCell::Clue { direction: Step::Right, count: 2 };
        let mut yajilin = Yajilin::new(vec![vec![clue, YajilinCell::Empty, YajilinCell::Empty]]).unwrap();
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 1, 3).unwrap();
        yajilin.constrain(&edges, &mut oracle);

        // two shaded cells side by side are forbidden
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }

    #[test]
    fn shaded_cells_are_marked() {
        let clue = YajilinCell::Clue { direction: Step::Right, count: 1 };
        let mut yajilin = Yajilin::new(vec![vec![clue, YajilinCell::Empty]]).unwrap();
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 1, 2).unwrap();
        yajilin.constrain(&edges, &mut oracle);

        assert_eq!(oracle.check(), CheckResult::Sat);
        let model = oracle.model().unwrap();
        assert_eq!(yajilin.marked(&model), vec![Position(0, 1)]);
        assert_eq!(yajilin.shades[(0, 0)], None);
        assert_eq!(yajilin.shades[(0, 1)].and_then(|term| oracle.name_of(term)), Some("shade[0][1]"));
    }

    #[test]
    fn shades_are_found_by_position() {
        let e = YajilinCell::Empty;
        let clue = YajilinCell::Clue { direction: Step::Left, count: 0 };
        let mut yajilin = Yajilin::new(vec![vec![e, e, e], vec![e, e, clue]]).unwrap();
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 2, 3).unwrap();
        yajilin.constrain(&edges, &mut oracle);

        assert_eq!(yajilin.shade_of(Position(1, 2)), None);
        assert_eq!(yajilin.shade_of(Position(2, 0)), None);
        let shade = yajilin.shade_of(Position(1, 1)).unwrap();
        assert_eq!(oracle.name_of(shade), Some("shade[1][1]"));
    }
}
