use std::ops::{Index, Not};

use itertools::Itertools;
use varisat::{ExtendFormula, Lit};

/// A literal, or a constant that has been folded away during encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Bit {
    Const(bool),
    Lit(Lit),
}

impl Not for Bit {
    type Output = Bit;

    fn not(self) -> Self::Output {
        match self {
            Bit::Const(value) => Bit::Const(!value),
            Bit::Lit(lit) => Bit::Lit(!lit),
        }
    }
}

pub(crate) fn exactly_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    // no two are true; (!A + !B) * (!A + !C) * ...
    clauses.extend(lits.iter()
        .combinations(2)
        .map(|pair| vec![!**pair.index(0), !**pair.index(1)])
    );
    // at least one is true; A + B + C + ...
    clauses.push(lits.to_vec());

    clauses
}

/// Clauses for "exactly `k` of `lits`" by enumerating subsets. Only sensible for a handful of literals.
pub(crate) fn exactly_k_naive(lits: &[Lit], k: usize) -> Vec<Vec<Lit>> {
    if k > lits.len() {
        return vec![vec![]];
    }
    if k == 1 {
        return exactly_one(lits);
    }

    let mut clauses = Vec::new();
    // at most k: among any k + 1, one is false
    clauses.extend(lits.iter()
        .combinations(k + 1)
        .map(|subset| subset.into_iter().map(|lit| !*lit).collect_vec()));
    // at least k: among any n - k + 1, one is true
    if k > 0 {
        clauses.extend(lits.iter()
            .combinations(lits.len() - k + 1)
            .map(|subset| subset.into_iter().copied().collect_vec()));
    }

    clauses
}

/// Tseitin AND gate, returning a bit equivalent to the conjunction of `inputs`.
pub(crate) fn and_gate(formula: &mut impl ExtendFormula, inputs: &[Bit]) -> Bit {
    let mut lits = Vec::with_capacity(inputs.len());
    for input in inputs {
        match input {
            Bit::Const(false) => return Bit::Const(false),
            Bit::Const(true) => {}
            Bit::Lit(lit) => lits.push(*lit),
        }
    }

    lits.sort();
    lits.dedup();
    match lits.as_slice() {
        [] => Bit::Const(true),
        [single] => Bit::Lit(*single),
        _ => {
            if lits.iter().any(|lit| lits.contains(&!*lit)) {
                return Bit::Const(false);
            }

            let gate = formula.new_var().positive();
            // gate => every input
            for lit in &lits {
                formula.add_clause(&[!gate, *lit]);
            }
            // every input => gate
            let mut clause = lits.iter().map(|lit| !*lit).collect_vec();
            clause.push(gate);
            formula.add_clause(&clause);

            Bit::Lit(gate)
        }
    }
}

/// Tseitin OR gate, by De Morgan over [`and_gate`].
pub(crate) fn or_gate(formula: &mut impl ExtendFormula, inputs: &[Bit]) -> Bit {
    !and_gate(formula, &inputs.iter().map(|b| !*b).collect_vec())
}

/// Unary counter over `inputs`: `out[j]` holds exactly when at least `j + 1` inputs hold, for `j < limit`.
///
/// Built as a sequential counter with full equivalences, so the outputs may be used under negation.
pub(crate) fn unary_count(formula: &mut impl ExtendFormula, inputs: &[Bit], limit: usize) -> Vec<Bit> {
    let mut counts = vec![Bit::Const(false); limit];

    for input in inputs {
        let mut next = Vec::with_capacity(limit);
        for j in 0..limit {
            // at least j + 1 so far: already had j + 1, or had j and this input holds
            let carried = match j {
                0 => *input,
                _ => and_gate(formula, &[*input, counts[j - 1]]),
            };
            next.push(or_gate(formula, &[counts[j], carried]));
        }
        counts = next;
    }

    counts
}

/// A bit equivalent to "exactly `target` of `inputs` hold".
pub(crate) fn exactly(formula: &mut impl ExtendFormula, inputs: &[Bit], target: i64) -> Bit {
    if target < 0 || target as usize > inputs.len() {
        return Bit::Const(false);
    }

    let target = target as usize;
    let counts = unary_count(formula, inputs, target + 1);
    let at_least = match target {
        0 => Bit::Const(true),
        _ => counts[target - 1],
    };
    let more = !counts[target];

    and_gate(formula, &[at_least, more])
}

#[cfg(test)]
mod tests {
    use varisat::{CnfFormula, ExtendFormula, Solver};

    use super::*;

    fn count_models(formula: &CnfFormula, lits: &[Lit]) -> usize {
        // enumerate by brute force over the named literals, letting the solver fill in gates
        (0..1usize << lits.len())
            .filter(|mask| {
                let mut solver = Solver::new();
                solver.add_formula(formula);
                let assumptions = lits.iter().enumerate()
                    .map(|(i, lit)| if mask & (1 << i) != 0 { *lit } else { !*lit })
                    .collect_vec();
                solver.assume(&assumptions);
                solver.solve().unwrap()
            })
            .count()
    }

    #[test]
    fn exactly_one_pairwise() {
        let mut formula = CnfFormula::new();
        let lits = (0..4).map(|_| formula.new_var().positive()).collect_vec();
        for clause in exactly_one(&lits) {
            formula.add_clause(&clause);
        }
        assert_eq!(count_models(&formula, &lits), 4);
    }

    #[test]
    fn naive_two_of_four() {
        let mut formula = CnfFormula::new();
        let lits = (0..4).map(|_| formula.new_var().positive()).collect_vec();
        for clause in exactly_k_naive(&lits, 2) {
            formula.add_clause(&clause);
        }
        assert_eq!(count_models(&formula, &lits), 6);
    }

    #[test]
    fn counter_is_reified() {
        // assert NOT (exactly 2 of 4): 16 - 6 assignments remain
        let mut formula = CnfFormula::new();
        let lits = (0..4).map(|_| formula.new_var().positive()).collect_vec();
        let bits = lits.iter().map(|l| Bit::Lit(*l)).collect_vec();
        match exactly(&mut formula, &bits, 2) {
            Bit::Lit(lit) => formula.add_clause(&[!lit]),
            Bit::Const(_) => panic!("expected a gate"),
        }
        assert_eq!(count_models(&formula, &lits), 10);
    }

    #[test]
    fn impossible_targets_fold() {
        let mut formula = CnfFormula::new();
        let bits = vec![Bit::Lit(formula.new_var().positive())];
        assert_eq!(exactly(&mut formula, &bits, 2), Bit::Const(false));
        assert_eq!(exactly(&mut formula, &bits, -1), Bit::Const(false));
        assert_eq!(and_gate(&mut formula, &[Bit::Const(true)]), Bit::Const(true));
    }
}
