use std::collections::BTreeMap;

use itertools::Itertools;
use ndarray::Array2;

use crate::expr::{BoolExpr, IntExpr, Term};
use crate::grid::EdgeGrid;
use crate::location::{Dims, Position};

/// A partition of the grid into named regions. Cells with no region are holes.
#[derive(Clone, Debug)]
pub(crate) struct Regions {
    ids: Array2<Option<usize>>,
}

impl Regions {
    pub(crate) fn new(ids: Array2<Option<usize>>) -> Self {
        Self { ids }
    }

    pub(crate) fn from_dense(ids: &Array2<usize>) -> Self {
        Self { ids: ids.map(|id| Some(*id)) }
    }

    pub(crate) fn of(&self, position: Position) -> Option<usize> {
        self.ids.get(position.as_index()).copied().flatten()
    }

    /// Region ids in ascending order.
    pub(crate) fn ids(&self) -> Vec<usize> {
        self.ids.iter().flatten().copied().sorted().dedup().collect_vec()
    }

    pub(crate) fn members(&self, region: usize) -> Vec<Position> {
        self.ids.indexed_iter()
            .filter(|(_, id)| **id == Some(region))
            .map(|(index, _)| Position::from(index))
            .collect_vec()
    }

    /// For every region, the edges with exactly one endpoint inside it.
    pub(crate) fn crossings(&self, edges: &EdgeGrid<Term>) -> BTreeMap<usize, Vec<Term>> {
        let mut crossing: BTreeMap<usize, Vec<Term>> = BTreeMap::new();
        for (key, term) in edges.iter() {
            let pair = key.endpoints();
            let (a, b) = (self.of(pair.0), self.of(pair.1));
            if a == b {
                continue;
            }
            for region in [a, b].into_iter().flatten() {
                crossing.entry(region).or_default().push(*term);
            }
        }

        crossing
    }

    /// Each region is entered through exactly `count` crossing edges. Trivially skipped when there is only one region.
    pub(crate) fn crossing_constraints(&self, edges: &EdgeGrid<Term>, count: i64) -> Vec<BoolExpr> {
        let ids = self.ids();
        if ids.len() < 2 {
            return Vec::new();
        }

        let crossing = self.crossings(edges);
        ids.into_iter()
            .map(|region| IntExpr::sum(crossing.get(&region).into_iter().flatten().copied()).equals(count))
            .collect_vec()
    }

    /// Pairs of orthogonally adjacent cells lying in different regions, each pair reported once.
    pub(crate) fn borders(&self, dims: Dims) -> Vec<(Position, Position)> {
        dims.positions()
            .flat_map(|p| [Position(p.0, p.1 + 1), Position(p.0 + 1, p.1)].map(|q| (p, q)))
            .filter(|(p, q)| dims.contains(*q) && self.of(*p).is_some() && self.of(*q).is_some() && self.of(*p) != self.of(*q))
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::grid::declare_edge_vars;
    use crate::oracle::VarisatOracle;

    #[test]
    fn crossings_per_region() {
        // 0 0 1
        // 2 2 1
        let regions = Regions::from_dense(&array![[0, 0, 1], [2, 2, 1]]);
        let mut oracle = VarisatOracle::new();
        let edges = declare_edge_vars(&mut oracle, 2, 3).unwrap();
        let crossing = regions.crossings(&edges);

        assert_eq!(regions.ids(), vec![0, 1, 2]);
        assert_eq!(crossing[&0].len(), 3);
        assert_eq!(crossing[&1].len(), 2);
        assert_eq!(crossing[&2].len(), 3);
        assert_eq!(regions.members(1), vec![Position(0, 2), Position(1, 2)]);
    }

    #[test]
    fn holes_have_no_region() {
        let regions = Regions::new(array![[Some(0), None], [Some(0), Some(1)]]);
        let dims = Dims::new(2, 2).unwrap();
        assert_eq!(regions.of(Position(0, 1)), None);
        assert_eq!(regions.borders(dims), vec![(Position(1, 0), Position(1, 1))]);
    }
}
