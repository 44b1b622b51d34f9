use tracing::{debug, info, warn};

use crate::acceptance::Verdict;
use crate::connectivity::components;
use crate::error::GridError;
use crate::expr::{BoolExpr, Term};
use crate::grid::{declare_edge_vars, EdgeGrid};
use crate::oracle::{CheckResult, Oracle, VarisatOracle};
use crate::solution::Solution;
use crate::strategy::Strategy;

/// Limits on one run of the refinement loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Oracle queries allowed per run before giving up. [`None`] means no limit.
    pub max_iterations: Option<usize>,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self { max_iterations: Some(10_000) }
    }
}

/// Why a run ended without an accepted solution.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Exhaustion {
    /// The oracle proved no assignment remains.
    Unsatisfiable,
    /// The oracle could not decide.
    Unknown,
    IterationLimit,
    /// An assignment was rejected but nothing could soundly be excluded.
    Stalled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Accepted(Solution),
    Exhausted(Exhaustion),
}

/// Passed to the observer after every oracle query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IterationReport {
    /// 1-based, counted from the start of the current run.
    pub iteration: usize,
    pub components: usize,
    /// Exclusion clauses added by this iteration.
    pub exclusions: usize,
    pub accepted: bool,
}

/// Totals over the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize)]
pub struct SessionStats {
    pub checks: usize,
    pub exclusions: usize,
    pub solutions: usize,
}

type Observer = Box<dyn FnMut(&IterationReport)>;

/// One puzzle instance: a strategy, the oracle session it constrains, and the state of the refinement loop.
///
/// The oracle never sees connectivity directly. Each query returns some assignment satisfying the local rules;
/// the strategy judges its components, and the ones which cannot be part of the answer are excluded by a clause
/// before asking again. Assertions accumulate, so later runs (see [`other_solution`](Self::other_solution)) only get tighter.
pub struct SolveSession<S: Strategy, O: Oracle = VarisatOracle> {
    strategy: S,
    oracle: O,
    edges: EdgeGrid<Term>,
    config: RefinementConfig,
    state: SearchState,
    stats: SessionStats,
    iteration: usize,
    observer: Option<Observer>,
}

impl<S: Strategy> SolveSession<S> {
    /// Start a session on a fresh [`VarisatOracle`] with the default [`RefinementConfig`].
    pub fn new(strategy: S) -> Result<Self, GridError> {
        Self::with_oracle(strategy, VarisatOracle::new(), RefinementConfig::default())
    }
}

impl<S: Strategy, O: Oracle> SolveSession<S, O> {
    /// Declare the edge variables of `strategy`'s lattice on `oracle` and assert the puzzle's rules.
    pub fn with_oracle(mut strategy: S, mut oracle: O, config: RefinementConfig) -> Result<Self, GridError> {
        let lattice = strategy.lattice();
        let edges = declare_edge_vars(&mut oracle, lattice.rows(), lattice.cols())?;
        strategy.constrain(&edges, &mut oracle);
        debug!(strategy = strategy.name(), vars = oracle.var_count(), "constrained");

        Ok(Self {
            strategy,
            oracle,
            edges,
            config,
            state: SearchState::Searching,
            stats: SessionStats::default(),
            iteration: 0,
            observer: None,
        })
    }

    pub fn with_config(mut self, config: RefinementConfig) -> Self {
        self.config = config;
        self
    }

    /// Call `observer` after every oracle query.
    pub fn with_observer(mut self, observer: impl FnMut(&IterationReport) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The solution of the most recent successful run, if it has not been invalidated since.
    pub fn last_solution(&self) -> Option<&Solution> {
        match &self.state {
            SearchState::Accepted(solution) => Some(solution),
            _ => None,
        }
    }

    /// Run one query, analysis and exclusion round. Does nothing unless [`SearchState::Searching`].
    pub fn step(&mut self) -> &SearchState {
        if self.state != SearchState::Searching {
            return &self.state;
        }

        if self.config.max_iterations.is_some_and(|max| self.iteration >= max) {
            warn!(strategy = self.strategy.name(), iterations = self.iteration, "iteration limit reached");
            self.state = SearchState::Exhausted(Exhaustion::IterationLimit);
            return &self.state;
        }

        self.iteration += 1;
        self.stats.checks += 1;

        let model = match self.oracle.check() {
            CheckResult::Sat => self.oracle.model(),
            CheckResult::Unsat => {
                debug!(strategy = self.strategy.name(), iteration = self.iteration, "unsatisfiable");
                self.state = SearchState::Exhausted(Exhaustion::Unsatisfiable);
                self.notify(self.barren_report());
                return &self.state;
            }
            CheckResult::Unknown => None,
        };
        let Some(model) = model else {
            warn!(strategy = self.strategy.name(), iteration = self.iteration, "oracle returned no verdict, giving up");
            self.state = SearchState::Exhausted(Exhaustion::Unknown);
            self.notify(self.barren_report());
            return &self.state;
        };

        let assignment = self.edges.resolve(&model);
        let found = components(&assignment);
        let verdict = self.strategy.judge(&found);

        let mut report = IterationReport {
            iteration: self.iteration,
            components: found.len(),
            exclusions: 0,
            accepted: verdict.is_accept(),
        };

        match verdict {
            Verdict::Accept => {
                info!(strategy = self.strategy.name(), iterations = self.iteration, "accepted");
                self.stats.solutions += 1;
                self.state = SearchState::Accepted(Solution::new(assignment, self.strategy.marked(&model)));
            }
            Verdict::Reject(exclusions) if exclusions.is_empty() => {
                warn!(strategy = self.strategy.name(), iteration = self.iteration, "rejected with nothing to exclude");
                self.state = SearchState::Exhausted(Exhaustion::Stalled);
            }
            Verdict::Reject(exclusions) => {
                for keys in &exclusions {
                    // at least one of these edges must go
                    let clause = BoolExpr::any(keys.iter()
                        .filter_map(|key| self.edges.get(*key))
                        .map(|term| !BoolExpr::from(*term)));
                    self.oracle.assert(&clause);
                }

                report.exclusions = exclusions.len();
                self.stats.exclusions += exclusions.len();
                debug!(
                    strategy = self.strategy.name(),
                    iteration = self.iteration,
                    components = found.len(),
                    exclusions = exclusions.len(),
                    "excluded components",
                );
            }
        }

        self.notify(report);
        &self.state
    }

    /// The report of a query which produced no assignment.
    fn barren_report(&self) -> IterationReport {
        IterationReport { iteration: self.iteration, components: 0, exclusions: 0, accepted: false }
    }

    fn notify(&mut self, report: IterationReport) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&report);
        }
    }

    /// Run the refinement loop to completion.
    ///
    /// Once a solution is accepted it is returned again on every call without querying the oracle.
    /// Once exhausted, returns [`None`] without querying the oracle.
    pub fn solve(&mut self) -> Option<&Solution> {
        while self.state == SearchState::Searching {
            self.step();
        }

        self.last_solution()
    }

    /// Exclude the last solution and search again, to find a different one or prove there is none.
    ///
    /// Returns [`None`] immediately if no solution has been found yet.
    pub fn other_solution(&mut self) -> Option<&Solution> {
        let SearchState::Accepted(previous) = &self.state else {
            return None;
        };

        // some edge must differ from the previous solution
        let differs = BoolExpr::any(self.edges.iter().map(|(key, term)| {
            let was = BoolExpr::from(*term);
            match previous.edges().is_active(key) {
                true => !was,
                false => was,
            }
        }));
        self.oracle.assert(&differs);

        self.state = SearchState::Searching;
        self.iteration = 0;
        self.solve()
    }
}
