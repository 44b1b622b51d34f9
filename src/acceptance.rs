use std::collections::BTreeSet;

use crate::connectivity::Component;
use crate::grid::EdgeKey;

/// What a strategy makes of the components of one candidate assignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Accept,
    /// Each set becomes one clause: at least one of its edges must be absent.
    /// An empty list means no sound exclusion exists and the search cannot progress.
    Reject(Vec<BTreeSet<EdgeKey>>),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// The shared predicate for "exactly one loop" puzzles.
///
/// - no component: accepted only if `allow_empty`;
/// - one component: accepted if it `covers` the puzzle, excluded otherwise;
/// - several: every component failing `covers` is excluded on its own. If all of them cover, the combination is excluded instead,
///   since a single loop cannot contain two disjoint cycles but any one of them might still be the answer.
pub fn single_loop(components: &[Component], allow_empty: bool, covers: impl Fn(&Component) -> bool) -> Verdict {
    match components {
        [] if allow_empty => Verdict::Accept,
        [] => Verdict::Reject(Vec::new()),
        [only] if covers(only) => Verdict::Accept,
        [only] => Verdict::Reject(vec![only.edges.clone()]),
        many => {
            let failing = many.iter()
                .filter(|c| !covers(c))
                .map(|c| c.edges.clone())
                .collect::<Vec<_>>();

            match failing.is_empty() {
                true => Verdict::Reject(vec![many.iter().flat_map(|c| c.edges.iter().copied()).collect()]),
                false => Verdict::Reject(failing),
            }
        }
    }
}
