use std::collections::HashSet;

use unordered_pair::UnorderedPair;

use crate::error::GridError;
use crate::location::{Dims, Position};
use crate::shape::Step;
use crate::strategy::SimpleLoop;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A hole or wall was placed outside the bounds specified by `dims` on a builder.
    FeatureOutOfBounds(Position),
}

impl From<BuilderInvalidReason> for GridError {
    fn from(value: BuilderInvalidReason) -> Self {
        match value {
            BuilderInvalidReason::FeatureOutOfBounds(position) => GridError::OutOfBounds(position),
        }
    }
}

/// A builder for [`SimpleLoop`] boards: a rectangle of cells, some dropped as holes, some neighbours separated by walls.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone, Debug)]
pub struct LoopBoardBuilder {
    dims: Dims,
    invalid_reasons: Vec<BuilderInvalidReason>,
    // walls
    edge_blacklist: HashSet<UnorderedPair<Position>>,
    // holes
    location_blacklist: HashSet<Position>,
}

impl LoopBoardBuilder {
    pub fn with_dims(dims: Dims) -> Self {
        Self {
            dims,
            invalid_reasons: Default::default(),
            edge_blacklist: Default::default(),
            location_blacklist: Default::default(),
        }
    }

    fn check_bounds(&mut self, location: Position) -> bool {
        if self.dims.contains(location) {
            return true;
        }

        self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds(location));
        false
    }

    /// Drop a location from the board. The loop will not pass through it.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn drop_location(&mut self, location: Position) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check_bounds(location) {
            self.location_blacklist.insert(location);
        }
        self
    }

    /// Disconnect the two `locations`, i.e. place a wall between them.
    ///
    /// A wall prevents the loop from crossing it.
    /// If the two locations are not adjacent, this function does nothing and does not invalidate the builder.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if either location is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn disconnect(&mut self, locations: UnorderedPair<Position>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for location in [locations.0, locations.1] {
            if !self.check_bounds(location) {
                return self;
            }
        }

        if Step::direction_to(locations.0, locations.1).is_some() {
            self.edge_blacklist.insert(locations);
        }
        self
    }

    /// Shorthand for multiple calls to [`Self::disconnect`], with the same conditions.
    ///
    /// Disconnect cells neighboring `location`.
    pub fn disconnect_around(&mut self, location: Position, directions: &[Step]) -> &mut Self {
        for direction in directions {
            self.disconnect(UnorderedPair::from((location, direction.attempt_from(location))));
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`SimpleLoop`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<SimpleLoop, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(SimpleLoop::new(self.dims, self.location_blacklist.clone(), self.edge_blacklist.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_invalidates() {
        let mut builder = LoopBoardBuilder::with_dims(Dims::new(2, 2).unwrap());
        builder.drop_location(Position(0, 0)).drop_location(Position(2, 0)).drop_location(Position(5, 5));
        // only the first failure is recorded, later calls do nothing
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds(Position(2, 0))]));
        assert!(builder.build().is_err());
    }

    #[test]
    fn walls_need_neighbours() {
        let mut builder = LoopBoardBuilder::with_dims(Dims::new(3, 3).unwrap());
        builder.disconnect(UnorderedPair(Position(0, 0), Position(2, 2)));
        assert!(builder.edge_blacklist.is_empty());

        builder.disconnect_around(Position(1, 1), &[Step::Up, Step::Left]);
        assert_eq!(builder.edge_blacklist.len(), 2);
        assert!(builder.edge_blacklist.contains(&UnorderedPair(Position(1, 0), Position(1, 1))));
        assert!(builder.is_valid().is_none());
    }

    #[test]
    fn walls_off_the_edge_invalidate() {
        let mut builder = LoopBoardBuilder::with_dims(Dims::new(3, 3).unwrap());
        builder.disconnect_around(Position(0, 0), &[Step::Up]);
        assert!(builder.is_valid().is_some());
    }
}
