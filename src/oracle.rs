//! The decision oracle consumed by the refinement driver.
//!
//! [`Oracle`] is the whole contract: declare 0/1 variables, assert formulas, check, read a model.
//! [`VarisatOracle`] is the built-in backend, Tseitin-encoding [`BoolExpr`]s into CNF for [`varisat`].

use itertools::Itertools;
use varisat::{ExtendFormula, Lit, Solver, Var};

use crate::expr::{BoolExpr, Term};
use crate::logic::{and_gate, exactly, exactly_k_naive, or_gate, Bit};

/// Outcome of [`Oracle::check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CheckResult {
    Sat,
    Unsat,
    /// The oracle gave up or failed; treated as [`Unsat`](CheckResult::Unsat) by the refinement driver.
    Unknown,
}

/// A satisfying assignment, indexed by [`Term`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub(crate) fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Value of `term` as a boolean. Terms the oracle never constrained read as false.
    pub fn value(&self, term: Term) -> bool {
        self.values.get(term.index()).copied().unwrap_or(false)
    }

    /// Value of `term` as the integer 0 or 1.
    pub fn eval(&self, term: Term) -> i64 {
        self.value(term) as i64
    }

}

/// An isolated oracle session: one variable namespace and one cumulative assertion set.
///
/// Sessions are owned by exactly one [`SolveSession`](crate::SolveSession) and never shared between puzzles.
pub trait Oracle {
    /// Declare a fresh integer variable with domain `{0, 1}`.
    fn declare_var(&mut self, name: &str) -> Term;
    /// Add `formula` to the assertion set. Assertions are never retracted.
    ///
    /// Terms declared on another session read as false, as they do in a [`Model`].
    fn assert(&mut self, formula: &BoolExpr);
    fn check(&mut self) -> CheckResult;
    /// The model found by the most recent [`check`](Oracle::check), if it returned [`CheckResult::Sat`].
    fn model(&self) -> Option<Model>;
    /// Name given to `term` at declaration.
    fn name_of(&self, term: Term) -> Option<&str>;
    fn var_count(&self) -> usize;
}

/// Above this many parts, cardinality constraints use a counter instead of subset enumeration.
const NAIVE_CARDINALITY_LIMIT: usize = 6;

/// [`Oracle`] backed by the [`varisat`] CDCL solver.
pub struct VarisatOracle {
    solver: Solver<'static>,
    vars: Vec<Var>,
    names: Vec<String>,
    // a literal fixed to true, used to assert constants
    truth: Lit,
    last_model: Option<Model>,
}

impl Default for VarisatOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VarisatOracle {
    pub fn new() -> Self {
        let mut solver = Solver::new();
        let truth = solver.new_var().positive();
        solver.add_clause(&[truth]);

        Self {
            solver,
            vars: Vec::new(),
            names: Vec::new(),
            truth,
            last_model: None,
        }
    }

    fn bit_to_lit(&self, bit: Bit) -> Lit {
        match bit {
            Bit::Const(true) => self.truth,
            Bit::Const(false) => !self.truth,
            Bit::Lit(lit) => lit,
        }
    }

    /// Tseitin-encode `expr`, returning a bit equivalent to it.
    fn encode(&mut self, expr: &BoolExpr) -> Bit {
        match expr {
            BoolExpr::Const(value) => Bit::Const(*value),
            BoolExpr::Var(term) => match self.vars.get(term.index()) {
                Some(var) => Bit::Lit(var.positive()),
                None => {
                    tracing::warn!(term = term.index(), vars = self.vars.len(), "term not declared on this oracle, reading it as false");
                    Bit::Const(false)
                }
            },
            BoolExpr::Not(inner) => !self.encode(inner),
            BoolExpr::And(inner) => {
                let bits = inner.iter().map(|e| self.encode(e)).collect_vec();
                and_gate(&mut self.solver, &bits)
            }
            BoolExpr::Or(inner) => {
                let bits = inner.iter().map(|e| self.encode(e)).collect_vec();
                or_gate(&mut self.solver, &bits)
            }
            BoolExpr::Implies(a, b) => {
                let bits = [!self.encode(a), self.encode(b)];
                or_gate(&mut self.solver, &bits)
            }
            BoolExpr::Exactly { parts, target } => {
                let bits = parts.iter().map(|e| self.encode(e)).collect_vec();
                exactly(&mut self.solver, &bits, *target)
            }
        }
    }

    fn add_clause(&mut self, bits: &[Bit]) {
        if bits.contains(&Bit::Const(true)) {
            return;
        }

        let clause = bits.iter()
            .filter(|b| **b != Bit::Const(false))
            .map(|b| self.bit_to_lit(*b))
            .collect_vec();
        match clause.is_empty() {
            true => self.solver.add_clause(&[!self.truth]),
            false => self.solver.add_clause(&clause),
        }
    }

    /// Assert at the top level, avoiding gate variables where a formula is already clausal.
    fn assert_top(&mut self, formula: &BoolExpr) {
        match formula {
            BoolExpr::And(inner) => inner.iter().for_each(|e| self.assert_top(e)),
            BoolExpr::Or(inner) => {
                let bits = inner.iter().map(|e| self.encode(e)).collect_vec();
                self.add_clause(&bits);
            }
            BoolExpr::Implies(a, b) => {
                let bits = [!self.encode(a), self.encode(b)];
                self.add_clause(&bits);
            }
            BoolExpr::Not(inner) if matches!(**inner, BoolExpr::Or(_)) => {
                if let BoolExpr::Or(disjuncts) = &**inner {
                    disjuncts.iter().for_each(|e| self.assert_top(&!e.clone()));
                }
            }
            BoolExpr::Exactly { parts, target } if parts.len() <= NAIVE_CARDINALITY_LIMIT && *target >= 0 => {
                let bits = parts.iter().map(|e| self.encode(e)).collect_vec();
                let fixed = bits.iter().filter(|b| **b == Bit::Const(true)).count() as i64;
                let lits = bits.iter().filter_map(|b| match b {
                    Bit::Lit(lit) => Some(*lit),
                    Bit::Const(_) => None,
                }).collect_vec();

                let remaining = *target - fixed;
                if remaining < 0 {
                    self.add_clause(&[]);
                    return;
                }
                for clause in exactly_k_naive(&lits, remaining as usize) {
                    let bits = clause.into_iter().map(Bit::Lit).collect_vec();
                    self.add_clause(&bits);
                }
            }
            other => {
                let bit = self.encode(other);
                self.add_clause(&[bit]);
            }
        }
    }
}

impl Oracle for VarisatOracle {
    fn declare_var(&mut self, name: &str) -> Term {
        let term = Term(self.vars.len());
        self.vars.push(self.solver.new_var());
        self.names.push(name.to_owned());
        term
    }

    fn assert(&mut self, formula: &BoolExpr) {
        self.last_model = None;
        self.assert_top(formula);
    }

    fn check(&mut self) -> CheckResult {
        self.last_model = None;
        match self.solver.solve() {
            Ok(true) => {
                let Some(assignment) = self.solver.model() else {
                    tracing::warn!("oracle reported sat without a model");
                    return CheckResult::Unknown;
                };

                let mut by_var = vec![false; assignment.len() + 1];
                for lit in assignment {
                    if let Some(slot) = by_var.get_mut(lit.var().index()) {
                        *slot = lit.is_positive();
                    }
                }
                let values = self.vars.iter()
                    .map(|var| by_var.get(var.index()).copied().unwrap_or(false))
                    .collect_vec();

                self.last_model = Some(Model::from_values(values));
                CheckResult::Sat
            }
            Ok(false) => CheckResult::Unsat,
            Err(err) => {
                tracing::warn!(error = ?err, "oracle failed, reporting unknown");
                CheckResult::Unknown
            }
        }
    }

    fn model(&self) -> Option<Model> {
        self.last_model.clone()
    }

    fn name_of(&self, term: Term) -> Option<&str> {
        self.names.get(term.index()).map(String::as_str)
    }

    fn var_count(&self) -> usize {
        self.vars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{sum_equals, IntExpr};

    #[test]
    fn sat_model_satisfies_assertions() {
        let mut oracle = VarisatOracle::new();
        let terms = (0..5).map(|i| oracle.declare_var(&format!("x{i}"))).collect_vec();
        oracle.assert(&sum_equals(terms.iter(), 3));
        oracle.assert(&BoolExpr::from(terms[0]).implies(!BoolExpr::from(terms[1])));
        oracle.assert(&BoolExpr::from(terms[0]));

        assert_eq!(oracle.check(), CheckResult::Sat);
        let model = oracle.model().unwrap();
        assert_eq!(model.eval(terms[0]), 1);
        assert_eq!(model.eval(terms[1]), 0);
        assert_eq!(terms.iter().map(|t| model.eval(*t)).sum::<i64>(), 3);
        assert_eq!(oracle.name_of(terms[4]), Some("x4"));
    }

    #[test]
    fn contradiction_is_unsat() {
        let mut oracle = VarisatOracle::new();
        let a = oracle.declare_var("a");
        let b = oracle.declare_var("b");
        oracle.assert(&IntExpr::sum([a, b]).equals(2));
        oracle.assert(&!BoolExpr::from(a).and(BoolExpr::from(b)));

        assert_eq!(oracle.check(), CheckResult::Unsat);
        assert!(oracle.model().is_none());
    }

    #[test]
    fn assertions_accumulate_between_checks() {
        let mut oracle = VarisatOracle::new();
        let terms = (0..3).map(|i| oracle.declare_var(&format!("e{i}"))).collect_vec();
        oracle.assert(&IntExpr::sum(terms.iter()).in_set(&[0, 2]));

        let mut seen = Vec::new();
        while oracle.check() == CheckResult::Sat {
            let model = oracle.model().unwrap();
            let values = terms.iter().map(|t| model.value(*t)).collect_vec();
            // block this exact assignment
            oracle.assert(&BoolExpr::any(terms.iter().zip(&values).map(|(t, v)| match v {
                true => !BoolExpr::from(*t),
                false => BoolExpr::from(*t),
            })));
            seen.push(values);
        }

        // zero edges, or one of three pairs
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn large_cardinality_uses_counter() {
        let mut oracle = VarisatOracle::new();
        let terms = (0..12).map(|i| oracle.declare_var(&format!("x{i}"))).collect_vec();
        oracle.assert(&sum_equals(terms.iter(), 7));
        oracle.assert(&BoolExpr::all(terms[..5].iter().map(|t| !BoolExpr::from(*t))));

        assert_eq!(oracle.check(), CheckResult::Sat);
        let model = oracle.model().unwrap();
        assert!(terms[5..].iter().all(|t| model.value(*t)));
    }

    #[test]
    fn terms_from_another_session_read_as_false() {
        let mut other = VarisatOracle::new();
        other.declare_var("a");
        let foreign = other.declare_var("b");

        let mut oracle = VarisatOracle::new();
        oracle.declare_var("x");
        oracle.assert(&!BoolExpr::from(foreign));
        assert_eq!(oracle.check(), CheckResult::Sat);

        oracle.assert(&BoolExpr::from(foreign));
        assert_eq!(oracle.check(), CheckResult::Unsat);
    }
}
