//! Typed, oracle-agnostic constraint expressions.
//!
//! Every variable handed out by an [`Oracle`](crate::oracle::Oracle) is a 0/1 integer.
//! [`IntExpr`] is a constant plus a count of boolean parts, which covers the degree sums, clue counts and region sums puzzle strategies need.
//! Equality between two [`IntExpr`]s normalises into a single [`BoolExpr::Exactly`] cardinality constraint.

use std::ops::{Add, Not};

use crate::oracle::Model;

/// Opaque handle to a 0/1 oracle variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Term(pub(crate) usize);

impl Term {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoolExpr {
    Const(bool),
    /// The variable equals 1.
    Var(Term),
    Not(Box<BoolExpr>),
    And(Vec<BoolExpr>),
    Or(Vec<BoolExpr>),
    Implies(Box<BoolExpr>, Box<BoolExpr>),
    /// Exactly `target` of `parts` hold.
    Exactly { parts: Vec<BoolExpr>, target: i64 },
}

impl BoolExpr {
    pub const TRUE: Self = Self::Const(true);
    pub const FALSE: Self = Self::Const(false);

    /// Conjunction of everything in `exprs`; the empty conjunction is true.
    pub fn all(exprs: impl IntoIterator<Item=BoolExpr>) -> Self {
        let mut flat = Vec::new();
        for expr in exprs {
            match expr {
                Self::Const(true) => {}
                Self::Const(false) => return Self::FALSE,
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => Self::TRUE,
            1 => flat.pop().unwrap_or(Self::TRUE),
            _ => Self::And(flat),
        }
    }

    /// Disjunction of everything in `exprs`; the empty disjunction is false.
    pub fn any(exprs: impl IntoIterator<Item=BoolExpr>) -> Self {
        let mut flat = Vec::new();
        for expr in exprs {
            match expr {
                Self::Const(false) => {}
                Self::Const(true) => return Self::TRUE,
                Self::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => Self::FALSE,
            1 => flat.pop().unwrap_or(Self::FALSE),
            _ => Self::Or(flat),
        }
    }

    pub fn and(self, other: BoolExpr) -> Self {
        Self::all([self, other])
    }

    pub fn or(self, other: BoolExpr) -> Self {
        Self::any([self, other])
    }

    pub fn implies(self, other: BoolExpr) -> Self {
        match (&self, &other) {
            (Self::Const(false), _) | (_, Self::Const(true)) => Self::TRUE,
            (Self::Const(true), _) => other,
            _ => Self::Implies(Box::new(self), Box::new(other)),
        }
    }

    /// Evaluate under a concrete assignment.
    pub fn evaluate(&self, model: &Model) -> bool {
        match self {
            Self::Const(value) => *value,
            Self::Var(term) => model.value(*term),
            Self::Not(inner) => !inner.evaluate(model),
            Self::And(inner) => inner.iter().all(|e| e.evaluate(model)),
            Self::Or(inner) => inner.iter().any(|e| e.evaluate(model)),
            Self::Implies(a, b) => !a.evaluate(model) || b.evaluate(model),
            Self::Exactly { parts, target } => parts.iter().filter(|e| e.evaluate(model)).count() as i64 == *target,
        }
    }
}

impl Not for BoolExpr {
    type Output = BoolExpr;

    fn not(self) -> Self::Output {
        match self {
            Self::Const(value) => Self::Const(!value),
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

impl From<Term> for BoolExpr {
    fn from(value: Term) -> Self {
        Self::Var(value)
    }
}

impl From<bool> for BoolExpr {
    fn from(value: bool) -> Self {
        Self::Const(value)
    }
}

/// `constant + (number of parts which hold)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntExpr {
    parts: Vec<BoolExpr>,
    constant: i64,
}

impl IntExpr {
    pub fn constant(value: i64) -> Self {
        Self { parts: Vec::new(), constant: value }
    }

    /// Sum of anything convertible to an [`IntExpr`].
    pub fn sum<T: Into<IntExpr>>(terms: impl IntoIterator<Item=T>) -> Self {
        terms.into_iter().fold(Self::default(), |acc, t| acc + t.into())
    }

    /// Number of boolean parts, i.e. the largest value this can take above its constant.
    pub fn width(&self) -> usize {
        self.parts.len()
    }

    pub fn equals(self, rhs: impl Into<IntExpr>) -> BoolExpr {
        let rhs = rhs.into();
        // a + ca == b + cb  <=>  a + (|b| - b) == cb - ca + |b|, and |b| - b counts the negated parts of b
        let target = rhs.constant - self.constant + rhs.parts.len() as i64;
        let mut parts = self.parts;
        parts.extend(rhs.parts.into_iter().map(|p| !p));

        match parts.is_empty() {
            true => BoolExpr::Const(target == 0),
            false => BoolExpr::Exactly { parts, target },
        }
    }

    /// The value lies in `allowed`.
    pub fn in_set(self, allowed: &[i64]) -> BoolExpr {
        BoolExpr::any(allowed.iter().map(|value| self.clone().equals(*value)))
    }

    pub fn evaluate(&self, model: &Model) -> i64 {
        self.constant + self.parts.iter().filter(|p| p.evaluate(model)).count() as i64
    }
}

impl Add for IntExpr {
    type Output = IntExpr;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.parts.extend(rhs.parts);
        self.constant += rhs.constant;
        self
    }
}

impl From<i64> for IntExpr {
    fn from(value: i64) -> Self {
        Self::constant(value)
    }
}

impl From<Term> for IntExpr {
    fn from(value: Term) -> Self {
        BoolExpr::from(value).into()
    }
}

impl From<&Term> for IntExpr {
    fn from(value: &Term) -> Self {
        (*value).into()
    }
}

/// The indicator of a boolean, 1 when it holds.
impl From<BoolExpr> for IntExpr {
    fn from(value: BoolExpr) -> Self {
        match value {
            BoolExpr::Const(true) => Self::constant(1),
            BoolExpr::Const(false) => Self::constant(0),
            other => Self { parts: vec![other], constant: 0 },
        }
    }
}

/// `sum(terms) == target`.
pub fn sum_equals<T: Into<IntExpr>>(terms: impl IntoIterator<Item=T>, target: i64) -> BoolExpr {
    IntExpr::sum(terms).equals(target)
}
