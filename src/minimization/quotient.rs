use tracing::trace;

use crate::math::Map;
use crate::{Automaton, EquivalenceReport, Show, StateId, Symbol};

/// Collapses every class of `report` into its representative. We assume that the classes form a
/// congruence, meaning that for two states `p` and `q` in the same class and every symbol `a`, the
/// successors of `p` and `q` on `a` either both do not exist or lie in the same class. Hence every
/// transition of a class can be taken from any of its members.
///
/// The states of the quotient are the representatives, ordered like the classes. Transitions whose
/// source or target does not belong to any class are dropped.
pub(crate) fn quotient<Q: StateId, S: Symbol>(
    automaton: Automaton<Q, S>,
    report: &EquivalenceReport<Q>,
) -> Automaton<Q, S> {
    let (_, alphabet, start, _, transitions) = automaton.into_parts();

    let mut collapsed = Map::default();
    for ((p, a), q) in transitions {
        let (Some(rp), Some(rq)) = (report.representative_of(&p), report.representative_of(&q)) else {
            trace!(
                "dropping transition {} on {} which leaves the partition",
                (p.show(), q.show()).show(),
                a.show()
            );
            continue;
        };
        collapsed.insert((rp.clone(), a), rq.clone());
    }

    let start = report.representative_of(&start).cloned().unwrap_or(start);
    Automaton::new(
        report.classes().iter().map(|c| c.representative().clone()),
        alphabet,
        start,
        report
            .classes()
            .iter()
            .filter(|c| c.is_accepting())
            .map(|c| c.representative().clone()),
        collapsed,
    )
}
