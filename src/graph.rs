use std::collections::BTreeSet;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;

use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::Position;

/// The graph of active edges of a resolved [`EdgeGrid`].
///
/// Nodes are positions touched by at least one active edge, weighted edges carry their canonical [`EdgeKey`].
/// Positions of degree 0 never appear.
pub struct EdgeGraph {
    pub(crate) graph: UnGraphMap<Position, EdgeKey>,
}

impl From<&EdgeGrid<bool>> for EdgeGraph {
    fn from(edges: &EdgeGrid<bool>) -> Self {
        let mut graph = UnGraphMap::with_capacity(edges.dims().cell_count(), edges.len());
        for key in edges.active() {
            let pair = key.endpoints();
            graph.add_edge(pair.0, pair.1, key);
        }

        Self { graph }
    }
}

impl EdgeGraph {
    /// Touched positions in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        self.graph.nodes().sorted().collect_vec()
    }

    /// Everything reachable from `start`, as `(positions, edges)`.
    pub(crate) fn reachable(&self, start: Position) -> (BTreeSet<Position>, BTreeSet<EdgeKey>) {
        let mut positions = BTreeSet::new();
        let mut edges = BTreeSet::new();

        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(position) = bfs.next(&self.graph) {
            positions.insert(position);
            // each edge is seen from both endpoints; the set keeps one copy
            edges.extend(self.graph.edges(position).map(|(_, _, key)| *key));
        }

        (positions, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Dims;

    #[test]
    fn only_touched_positions_are_nodes() {
        let dims = Dims::new(3, 3).unwrap();
        let edges = EdgeGrid::from_fn(dims, |key| key == EdgeKey::h(0, 0) || key == EdgeKey::v(0, 1));
        let graph = EdgeGraph::from(&edges);

        assert_eq!(graph.positions(), vec![Position(0, 0), Position(0, 1), Position(1, 1)]);

        let (positions, keys) = graph.reachable(Position(1, 1));
        assert_eq!(positions.len(), 3);
        assert_eq!(keys.into_iter().collect_vec(), vec![EdgeKey::h(0, 0), EdgeKey::v(0, 1)]);
    }
}
