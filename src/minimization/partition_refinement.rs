use tracing::trace;

use crate::math::Map;
use crate::{Automaton, StateId, Symbol};

/// The outcome of a run of Moore's algorithm. Groups are given as positions into the list of states,
/// members of a group are in state order and the groups are ordered by their first member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Refinement {
    pub(crate) groups: Vec<Vec<usize>>,
    pub(crate) group_counts: Vec<usize>,
}

/// A signature records for each symbol the id of the group that the successor currently belongs to,
/// or `None` if there is no successor.
type Signature = Vec<Option<usize>>;

/// Computes the coarsest stable partition of the states of `automaton` that refines the split into
/// rejecting and accepting states.
///
/// Every state carries its current group id. In each round, the states of every group are split according
/// to their [`Signature`] with respect to the ids of the previous round. As groups are only ever split,
/// the number of groups does not change precisely when no group was split, which is when we stop.
pub(crate) fn moore_partition_refinement<Q: StateId, S: Symbol>(
    automaton: &Automaton<Q, S>,
) -> Refinement {
    let states = automaton.states();
    let successors: Vec<Vec<Option<usize>>> = states
        .iter()
        .map(|q| {
            automaton
                .alphabet()
                .iter()
                .map(|a| {
                    automaton
                        .successor(q, a)
                        .and_then(|p| automaton.position(p))
                })
                .collect()
        })
        .collect();

    let (accepting, rejecting): (Vec<usize>, Vec<usize>) =
        (0..states.len()).partition(|&i| automaton.is_accepting(&states[i]));
    let mut groups: Vec<Vec<usize>> = [rejecting, accepting]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect();
    let mut group_of = vec![0; states.len()];
    assign_ids(&groups, &mut group_of);

    let mut group_counts = vec![groups.len()];
    loop {
        let mut refined: Vec<Vec<usize>> = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut splits: Map<Signature, usize> = Map::default();
            for &q in group {
                let signature: Signature = successors[q]
                    .iter()
                    .map(|target| target.map(|p| group_of[p]))
                    .collect();
                let id = *splits.entry(signature).or_insert_with(|| {
                    refined.push(vec![]);
                    refined.len() - 1
                });
                refined[id].push(q);
            }
        }

        trace!(
            "refinement round {} split {} groups into {}",
            group_counts.len(),
            groups.len(),
            refined.len()
        );
        let stable = refined.len() == groups.len();
        group_counts.push(refined.len());
        groups = refined;
        if stable {
            break;
        }
        assign_ids(&groups, &mut group_of);
    }

    groups.sort_by_key(|group| group[0]);
    Refinement {
        groups,
        group_counts,
    }
}

fn assign_ids(groups: &[Vec<usize>], group_of: &mut [usize]) {
    for (id, group) in groups.iter().enumerate() {
        for &q in group {
            group_of[q] = id;
        }
    }
}
