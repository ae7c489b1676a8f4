use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::error::MalformedAutomatonError;
use crate::math::Set;
use crate::{Automaton, Show, StateId, Symbol};

/// Type alias for a minimal representative of a state which is its length-lexicographically minimal
/// access sequence and the state itself.
pub type MinimalRepresentative<'a, Q, S> = (Vec<S>, &'a Q);

/// Iterator that returns the minimal representatives of the states of an [`Automaton`]. A minimal
/// representative for a state `q` is the length-lexicographically minimal word (with respect to the
/// order of the alphabet) with which `q` can be reached from a given origin. States are produced in
/// breadth-first order, so every state is visited at most once.
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a, Q: StateId, S: Symbol> {
    automaton: &'a Automaton<Q, S>,
    seen: BitSet,
    queue: VecDeque<(Vec<S>, usize)>,
}

impl<'a, Q: StateId, S: Symbol> MinimalRepresentatives<'a, Q, S> {
    /// Starts the exploration in `origin`. If `origin` is not a state, the iterator is empty.
    pub fn new(automaton: &'a Automaton<Q, S>, origin: &Q) -> Self {
        let mut seen = BitSet::with_capacity(automaton.size());
        let mut queue = VecDeque::new();
        if let Some(pos) = automaton.position(origin) {
            seen.insert(pos);
            queue.push_back((vec![], pos));
        }
        Self {
            automaton,
            seen,
            queue,
        }
    }
}

impl<'a, Q: StateId, S: Symbol> Iterator for MinimalRepresentatives<'a, Q, S> {
    type Item = MinimalRepresentative<'a, Q, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let automaton = self.automaton;
        let (access, pos) = self.queue.pop_front()?;
        let q = &automaton.states()[pos];
        for a in automaton.alphabet() {
            let Some(p) = automaton
                .successor(q, a)
                .and_then(|p| automaton.position(p))
            else {
                continue;
            };
            if self.seen.insert(p) {
                let mut extended = access.clone();
                extended.push(a.clone());
                self.queue.push_back((extended, p));
            }
        }
        Some((access, q))
    }
}

/// Allows iterating over the states that are reachable from some origin, in breadth-first order.
#[derive(Debug, Clone)]
pub struct ReachableStates<'a, Q: StateId, S: Symbol>(MinimalRepresentatives<'a, Q, S>);

impl<'a, Q: StateId, S: Symbol> ReachableStates<'a, Q, S> {
    /// Starts the exploration in `origin`.
    pub fn new(automaton: &'a Automaton<Q, S>, origin: &Q) -> Self {
        Self(MinimalRepresentatives::new(automaton, origin))
    }
}

impl<'a, Q: StateId, S: Symbol> Iterator for ReachableStates<'a, Q, S> {
    type Item = &'a Q;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, q)| q)
    }
}

impl<Q: StateId, S: Symbol> Automaton<Q, S> {
    /// Returns an iterator over the minimal representatives of all states reachable from the start.
    pub fn minimal_representatives(&self) -> MinimalRepresentatives<'_, Q, S> {
        MinimalRepresentatives::new(self, self.start())
    }

    /// Returns an iterator over the minimal representatives of all states reachable from `origin`.
    pub fn minimal_representatives_from(&self, origin: &Q) -> MinimalRepresentatives<'_, Q, S> {
        MinimalRepresentatives::new(self, origin)
    }

    /// Returns an iterator over all states reachable from the start state.
    pub fn reachable_states(&self) -> ReachableStates<'_, Q, S> {
        ReachableStates::new(self, self.start())
    }

    /// Returns an iterator over all states reachable from `origin`.
    pub fn reachable_states_from(&self, origin: &Q) -> ReachableStates<'_, Q, S> {
        ReachableStates::new(self, origin)
    }

    /// Returns the states that cannot be reached from the start state, in state order.
    pub fn unreachable_states(&self) -> Vec<&Q> {
        let reachable = self.reachable_positions();
        self.states()
            .iter()
            .enumerate()
            .filter(|(i, _)| !reachable.contains(*i))
            .map(|(_, q)| q)
            .collect()
    }

    /// Collects the positions of all states reachable from the start through a depth-first search.
    fn reachable_positions(&self) -> BitSet {
        let mut reachable = BitSet::with_capacity(self.size());
        let mut stack: Vec<usize> = self.position(self.start()).into_iter().collect();

        while let Some(current) = stack.pop() {
            if !reachable.insert(current) {
                continue;
            }
            let q = &self.states()[current];
            for a in self.alphabet() {
                if let Some(next) = self.successor(q, a).and_then(|p| self.position(p)) {
                    if !reachable.contains(next) {
                        stack.push(next);
                    }
                }
            }
        }
        reachable
    }

    /// Removes all states that are not reachable from the start state. Transitions are kept only if
    /// both their source and their target survive, so afterwards every transition connects two states.
    /// The order of the remaining states is unchanged.
    ///
    /// Fails if `self` is malformed, in particular if the start state is not a state.
    ///
    /// # Example
    /// ```
    /// use dfa_minimize::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::new()
    ///     .with_accepting(["q1"])
    ///     .with_transitions([("q0", 'a', "q1"), ("q2", 'a', "q1")])
    ///     .into_automaton("q0")
    ///     .unwrap();
    /// let pruned = dfa.prune().unwrap();
    /// assert_eq!(pruned.states(), &["q0", "q1"]);
    /// assert_eq!(pruned.num_transitions(), 1);
    /// ```
    pub fn prune(self) -> Result<Self, MalformedAutomatonError> {
        self.validate()?;
        let reachable = self.reachable_positions();
        let before = self.size();

        let (states, alphabet, start, accepting, transitions) = self.into_parts();
        let mut kept = Set::default();
        let states: Vec<Q> = states
            .into_iter()
            .enumerate()
            .filter_map(|(i, q)| {
                if reachable.contains(i) {
                    kept.insert(q.clone());
                    Some(q)
                } else {
                    trace!("removing unreachable state {}", q.show());
                    None
                }
            })
            .collect();

        let transitions: Vec<_> = transitions
            .into_iter()
            .filter(|((p, _), q)| kept.contains(p) && kept.contains(q))
            .collect();

        debug!(
            "pruning removed {} of {before} states, {} transitions remain",
            before - states.len(),
            transitions.len()
        );
        Ok(Automaton::new(
            states,
            alphabet,
            start,
            accepting,
            transitions,
        ))
    }
}
