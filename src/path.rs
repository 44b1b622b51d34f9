use std::collections::HashSet;

use itertools::Itertools;
use tracing::warn;

use crate::connectivity::components;
use crate::grid::{EdgeGrid, EdgeKey};
use crate::location::Position;

/// Order the loop of an accepted assignment into a walk, starting at its row-major first position.
///
/// Neighbours are tried right, left, down, up, over edges not yet walked.
/// A closed loop ends with its start repeated; an open path ends where it runs out of edges.
/// Returns an empty walk if no edge is active.
pub fn trace(edges: &EdgeGrid<bool>) -> Vec<Position> {
    let start = edges.dims().positions().find(|p| edges.degree(*p) > 0);
    match start {
        None => Vec::new(),
        Some(start) => walk(edges, start, &mut HashSet::new()),
    }
}

/// One walk per connected component, in row-major order of their first positions.
///
/// Open paths are walked from their row-major first endpoint, so a path is always traced end to end.
pub fn trace_all(edges: &EdgeGrid<bool>) -> Vec<Vec<Position>> {
    let mut consumed = HashSet::new();
    components(edges).into_iter()
        .filter_map(|component| {
            let start = component.positions.iter()
                .copied()
                .find(|p| edges.degree(*p) == 1)
                .or_else(|| component.anchor())?;
            Some(walk(edges, start, &mut consumed))
        })
        .collect_vec()
}

fn walk(edges: &EdgeGrid<bool>, start: Position, consumed: &mut HashSet<EdgeKey>) -> Vec<Position> {
    let dims = edges.dims();
    let bound = 4 * dims.cell_count();
    let mut path = vec![start];
    let mut at = start;

    for _ in 0..bound {
        let next = edges.exits(at).into_iter()
            .map(|step| (step, EdgeKey::leaving(at, step)))
            .find(|(_, key)| !consumed.contains(key));
        let Some((step, key)) = next else {
            return path;
        };

        consumed.insert(key);
        at = step.attempt_from(at);
        path.push(at);
        if at == start {
            return path;
        }
    }

    warn!(?start, steps = bound, "path reconstruction hit its step bound, truncating");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Dims;

    fn grid_with(dims: Dims, active: &[EdgeKey]) -> EdgeGrid<bool> {
        EdgeGrid::from_fn(dims, |key| active.contains(&key))
    }

    #[test]
    fn empty_grid_traces_nothing() {
        let grid = grid_with(Dims::new(2, 2).unwrap(), &[]);
        assert!(trace(&grid).is_empty());
        assert!(trace_all(&grid).is_empty());
    }

    #[test]
    fn square_closes_on_its_start() {
        let grid = grid_with(Dims::new(2, 2).unwrap(), &[EdgeKey::h(0, 0), EdgeKey::h(1, 0), EdgeKey::v(0, 0), EdgeKey::v(0, 1)]);
        assert_eq!(trace(&grid), vec![Position(0, 0), Position(0, 1), Position(1, 1), Position(1, 0), Position(0, 0)]);
    }

    #[test]
    fn open_paths_are_walked_end_to_end() {
        // an L from (0, 1) through (1, 1) to (1, 0)
        let grid = grid_with(Dims::new(2, 2).unwrap(), &[EdgeKey::v(0, 1), EdgeKey::h(1, 0)]);
        assert_eq!(trace_all(&grid), vec![vec![Position(0, 1), Position(1, 1), Position(1, 0)]]);
    }

    #[test]
    fn one_stroke_per_component() {
        let grid = grid_with(Dims::new(1, 5).unwrap(), &[EdgeKey::h(0, 0), EdgeKey::h(0, 3)]);
        assert_eq!(trace_all(&grid), vec![
            vec![Position(0, 0), Position(0, 1)],
            vec![Position(0, 3), Position(0, 4)],
        ]);
        // a single trace only follows the first component
        assert_eq!(trace(&grid), vec![Position(0, 0), Position(0, 1)]);
    }
}
