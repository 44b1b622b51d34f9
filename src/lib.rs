//! # `loopsat`
//!
//! A solver for grid loop puzzles: [Masyu](https://en.wikipedia.org/wiki/Masyu), [Slitherlink](https://en.wikipedia.org/wiki/Slitherlink),
//! Yajilin, Country Road, Kuroshiro, Detour, Double Back, and plain Hamiltonian cycles with holes and walls.
//! Pick a strategy from the [`strategy`] module (or build a [`SimpleLoop`](strategy::SimpleLoop) with a [`LoopBoardBuilder`]),
//! hand it to a [`SolveSession`], then call [`solve()`](SolveSession::solve) for a [`Solution`] and
//! [`other_solution()`](SolveSession::other_solution) to check it is unique.
//! [`puzzle::solve_document`] does all of this for a JSON document.
//!
//! # Internals
//! Every edge between orthogonally adjacent grid positions is a 0/1 variable.
//! The local rules of a puzzle (degrees, turns, clue counts, region crossings) are easy to state in SAT form; "the active
//! edges form one loop" is not. Rather than encode connectivity up front, we solve lazily:
//!
//! 1. Ask the oracle for any assignment satisfying the local rules.
//! 2. Split the active edges into connected components.
//! 3. If the strategy accepts the components, we are done.
//! Otherwise, for each component which cannot be part of the answer, assert that at least one of its edges is absent, and go to 1.
//!
//! The excluded subtours never come back, so every round makes progress, and in practice very few rounds are needed.
//! Assertions only accumulate, which is what makes the uniqueness check cheap: exclude the solution found, and run again.
//!
//! The oracle is anything implementing [`Oracle`](oracle::Oracle); [`VarisatOracle`](oracle::VarisatOracle) is the built-in backend.

pub use builder::LoopBoardBuilder;
pub use error::{GridError, PuzzleError};
pub use location::{Dims, Position};
pub use shape::Step;
pub use solution::{Playback, Solution};
pub use solver::{Exhaustion, IterationReport, RefinementConfig, SearchState, SessionStats, SolveSession};

pub mod acceptance;
pub mod builder;
pub mod connectivity;
pub mod error;
pub mod expr;
pub mod graph;
pub mod grid;
pub mod location;
pub(crate) mod logic;
pub mod oracle;
pub mod path;
pub mod puzzle;
pub mod shape;
pub mod solution;
pub(crate) mod solver;
pub mod strategy;
#[cfg(feature = "wasm")]
pub mod wasm;
