use std::collections::BTreeSet;

use crate::graph::EdgeGraph;
use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::Position;

/// A maximal connected set of active edges and the positions they touch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    pub positions: BTreeSet<Position>,
    pub edges: BTreeSet<EdgeKey>,
}

impl Component {
    pub fn contains(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    /// Whether every position in `required` lies on this component.
    pub fn covers<'a>(&self, mut required: impl Iterator<Item=&'a Position>) -> bool {
        required.all(|p| self.positions.contains(p))
    }

    /// Whether any of `keys` belongs to this component.
    pub fn touches_any(&self, keys: &[EdgeKey]) -> bool {
        keys.iter().any(|k| self.edges.contains(k))
    }

    /// Smallest position in row-major order; components are reported sorted by it.
    pub fn anchor(&self) -> Option<Position> {
        self.positions.first().copied()
    }
}

/// Partition the active edges of `edges` into maximal connected components, ordered by [`Component::anchor`].
pub fn components(edges: &EdgeGrid<bool>) -> Vec<Component> {
    let graph = EdgeGraph::from(edges);
    let mut seen = BTreeSet::new();
    let mut found = Vec::new();

    for start in graph.positions() {
        if seen.contains(&start) {
            continue;
        }

        let (positions, edges) = graph.reachable(start);
        seen.extend(positions.iter().copied());
        found.push(Component { positions, edges });
    }

    found
}
