use std::fmt::{Display, Formatter};

use crate::connectivity::{components, Component};
use crate::grid::EdgeGrid;
use crate::location::Position;
use crate::path::{trace, trace_all};
use crate::shape::Step;

/// An accepted assignment: the resolved edges plus any cells the puzzle fills in rather than traces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    edges: EdgeGrid<bool>,
    marked: Vec<Position>,
}

/// What the playback layer needs to enter a solution: strokes to draw and cells to fill.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Playback {
    pub strokes: Vec<Vec<Position>>,
    pub marked: Vec<Position>,
}

impl Solution {
    pub(crate) fn new(edges: EdgeGrid<bool>, mut marked: Vec<Position>) -> Self {
        marked.sort();
        Self { edges, marked }
    }

    pub fn edges(&self) -> &EdgeGrid<bool> {
        &self.edges
    }

    /// Filled cells in row-major order.
    pub fn marked(&self) -> &[Position] {
        &self.marked
    }

    pub fn is_marked(&self, position: Position) -> bool {
        self.marked.binary_search(&position).is_ok()
    }

    pub fn components(&self) -> Vec<Component> {
        components(&self.edges)
    }

    /// The loop as a walk; see [`trace`].
    pub fn path(&self) -> Vec<Position> {
        trace(&self.edges)
    }

    /// One walk per component; see [`trace_all`].
    pub fn strokes(&self) -> Vec<Vec<Position>> {
        trace_all(&self.edges)
    }

    pub fn playback(&self) -> Playback {
        Playback { strokes: self.strokes(), marked: self.marked.clone() }
    }

    fn glyph(&self, position: Position) -> char {
        let exits = self.edges.exits(position);
        let has = |step| exits.contains(&step);

        match (has(Step::Right), has(Step::Left), has(Step::Down), has(Step::Up)) {
            (false, false, false, false) if self.is_marked(position) => '#',
            (false, false, false, false) => '.',
            (true, true, false, false) => '─',
            (false, false, true, true) => '│',
            (true, false, true, false) => '┌',
            (false, true, true, false) => '┐',
            (true, false, false, true) => '└',
            (false, true, false, true) => '┘',
            (true, false, false, false) => '╶',
            (false, true, false, false) => '╴',
            (false, false, true, false) => '╷',
            (false, false, false, true) => '╵',
            (true, false, true, true) => '├',
            (false, true, true, true) => '┤',
            (true, true, true, false) => '┬',
            (true, true, false, true) => '┴',
            (true, true, true, true) => '┼',
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let dims = self.edges.dims();
        for row in 0..dims.rows() {
            let line = (0..dims.cols()).map(|col| self.glyph(Position(row, col))).collect::<String>();
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::EdgeKey;
    use crate::location::Dims;

    #[test]
    fn renders_box_drawing() {
        let active = [EdgeKey::h(0, 0), EdgeKey::h(1, 0), EdgeKey::v(0, 0), EdgeKey::v(0, 1)];
        let edges = EdgeGrid::from_fn(Dims::new(2, 3).unwrap(), |key| active.contains(&key));
        let solution = Solution::new(edges, vec![Position(1, 2)]);
        assert_eq!(format!("{}", solution), "┌┐.\n└┘#\n");
    }

    #[test]
    fn playback_serializes_positions_as_pairs() {
        let edges = EdgeGrid::from_fn(Dims::new(1, 2).unwrap(), |_| true);
        let solution = Solution::new(edges, vec![]);
        let json = serde_json::to_string(&solution.playback()).unwrap();
        assert_eq!(json, r#"{"strokes":[[[0,0],[0,1]]],"marked":[]}"#);
    }
}
