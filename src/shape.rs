use strum::VariantArray;

use crate::location::Position;

/// The four unit steps on a square grid.
///
/// Variant order is the neighbour priority used when tracing a path: right, left, down, up.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Right,
    Left,
    Down,
    Up,
}

impl Step {
    /// Steps which lead to a position indexed higher in row-major order.
    /// The edge taken by a forward step from `p` is stored at `p`.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    pub fn attempt_from(&self, position: Position) -> Position {
        match self {
            Self::Right => position.offset_by((0, 1)),
            Self::Left => position.offset_by((0, -1)),
            Self::Down => position.offset_by((1, 0)),
            Self::Up => position.offset_by((-1, 0)),
        }
    }

    pub fn is_forward(&self) -> bool {
        Self::FORWARD_VARIANTS.contains(self)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }

    /// The two steps at right angles to this one.
    pub fn perpendicular(&self) -> [Self; 2] {
        if self.is_horizontal() {
            [Self::Down, Self::Up]
        } else {
            [Self::Right, Self::Left]
        }
    }

    /// Determine the step from `a` to `b`, if they are orthogonal neighbours.
    pub fn direction_to(a: Position, b: Position) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        assert_eq!(Step::VARIANTS, &[Step::Right, Step::Left, Step::Down, Step::Up]);
    }

    #[test]
    fn direction_round_trip() {
        let origin = Position(1, 1);
        for step in Step::VARIANTS {
            let there = step.attempt_from(origin);
            assert_eq!(Step::direction_to(origin, there), Some(*step));
            assert!(there.is_adjacent(&origin));
        }
        assert_eq!(Step::direction_to(Position(0, 0), Position(1, 1)), None);
    }

    #[test]
    fn perpendiculars() {
        assert_eq!(Step::Left.perpendicular(), [Step::Down, Step::Up]);
        assert!(!Step::Up.perpendicular().contains(&Step::Down));
    }
}
