use std::borrow::Borrow;
use std::fmt::{Debug, Display};

use tracing::trace;

use crate::error::MalformedAutomatonError;
use crate::math::{Map, Set};
use crate::{Show, StateId, Symbol};

mod builder;
pub use builder::AutomatonBuilder;

/// A deterministic finite automaton given by an explicit transition table.
///
/// The states are kept in the order in which they were first given, this order is used for
/// everything that is reported back (transition tables, equivalence classes, the states of a
/// quotient). The alphabet is ordered as well, which fixes the order in which successors are
/// explored.
///
/// The table may be partial. A pair `(q, a)` without an entry, or whose entry points to something
/// that is not a state, has no successor, so every word that runs into it is rejected.
///
/// # Example
/// ```
/// use dfa_minimize::prelude::*;
///
/// let dfa = AutomatonBuilder::new()
///     .with_accepting(["q1"])
///     .with_transitions([("q0", 'a', "q1"), ("q1", 'a', "q0")])
///     .into_automaton("q0")
///     .unwrap();
/// assert!(dfa.accepts("a".chars()));
/// assert!(!dfa.accepts("aa".chars()));
/// assert!(!dfa.accepts("b".chars()));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton<Q: StateId, S: Symbol> {
    states: Vec<Q>,
    positions: Map<Q, usize>,
    alphabet: Vec<S>,
    start: Q,
    accepting: Set<Q>,
    transitions: Map<(Q, S), Q>,
}

impl<Q: StateId, S: Symbol> Automaton<Q, S> {
    /// Creates a new automaton from its parts. Construction never fails, duplicate states and
    /// symbols are dropped (the first occurrence determines the position) and accepting
    /// identifiers which are not states are ignored. Whether the start state and the transitions
    /// are consistent with the states and the alphabet can be checked with [`Self::validate`],
    /// which is done by [`Self::prune`] and [`Self::minimize`] anyway.
    pub fn new<X, Y, Z, T>(states: X, alphabet: Y, start: Q, accepting: Z, transitions: T) -> Self
    where
        X: IntoIterator<Item = Q>,
        Y: IntoIterator<Item = S>,
        Z: IntoIterator<Item = Q>,
        T: IntoIterator<Item = ((Q, S), Q)>,
    {
        let mut positions = Map::default();
        let mut ordered = vec![];
        for q in states {
            if !positions.contains_key(&q) {
                positions.insert(q.clone(), ordered.len());
                ordered.push(q);
            }
        }

        let mut seen = Set::default();
        let alphabet = alphabet
            .into_iter()
            .filter(|a| seen.insert(a.clone()))
            .collect();

        let accepting = accepting
            .into_iter()
            .filter(|q| {
                let known = positions.contains_key(q);
                if !known {
                    trace!("ignoring accepting state {} which does not exist", q.show());
                }
                known
            })
            .collect();

        Self {
            states: ordered,
            positions,
            alphabet,
            start,
            accepting,
            transitions: transitions.into_iter().collect(),
        }
    }

    /// Returns an [`AutomatonBuilder`], which allows assembling an automaton transition by transition.
    pub fn builder() -> AutomatonBuilder<Q, S> {
        AutomatonBuilder::new()
    }

    /// Checks that the start state is a state and that every transition leaves from a state and is
    /// labeled with a symbol of the alphabet.
    pub fn validate(&self) -> Result<(), MalformedAutomatonError> {
        if !self.contains_state(&self.start) {
            return Err(MalformedAutomatonError::UnknownStartState {
                state: self.start.show(),
            });
        }
        let alphabet: Set<&S> = self.alphabet.iter().collect();
        for (p, a) in self.transitions.keys() {
            if !self.contains_state(p) {
                return Err(MalformedAutomatonError::UnknownTransitionSource { state: p.show() });
            }
            if !alphabet.contains(a) {
                return Err(MalformedAutomatonError::UnknownTransitionSymbol { symbol: a.show() });
            }
        }
        Ok(())
    }

    /// The states in the order in which they were given.
    pub fn states(&self) -> &[Q] {
        &self.states
    }

    /// The ordered input alphabet.
    pub fn alphabet(&self) -> &[S] {
        &self.alphabet
    }

    /// The designated start state.
    pub fn start(&self) -> &Q {
        &self.start
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of entries in the transition table.
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if and only if `q` is a state of `self`.
    pub fn contains_state(&self, q: &Q) -> bool {
        self.positions.contains_key(q)
    }

    /// Returns the position of `q` in the list of states.
    pub(crate) fn position(&self, q: &Q) -> Option<usize> {
        self.positions.get(q).copied()
    }

    /// Returns true if and only if `q` is an accepting state.
    pub fn is_accepting(&self, q: &Q) -> bool {
        self.accepting.contains(q)
    }

    /// Iterates over the accepting states in state order.
    pub fn accepting_states(&self) -> impl Iterator<Item = &Q> + '_ {
        self.states.iter().filter(|q| self.is_accepting(q))
    }

    /// Iterates over the rejecting states in state order.
    pub fn rejecting_states(&self) -> impl Iterator<Item = &Q> + '_ {
        self.states.iter().filter(|q| !self.is_accepting(q))
    }

    /// Looks up the entry for `(q, a)` in the transition table. Unlike [`Self::successor`], the
    /// returned target need not be a state.
    pub fn transition(&self, q: &Q, a: &S) -> Option<&Q> {
        self.transitions.get(&(q.clone(), a.clone()))
    }

    /// Returns the state that is reached from `q` on `a`, if there is one.
    pub fn successor(&self, q: &Q, a: &S) -> Option<&Q> {
        self.transition(q, a).filter(|p| self.contains_state(p))
    }

    /// Iterates over all transitions `(p, a, q)` where `p` is a state and `a` a symbol, ordered by
    /// state and then by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (&Q, &S, &Q)> + '_ {
        self.states.iter().flat_map(move |p| {
            self.alphabet
                .iter()
                .filter_map(move |a| self.transition(p, a).map(|q| (p, a, q)))
        })
    }

    /// Runs `word` from the state `origin` and returns the state that is reached. If some symbol
    /// has no successor along the way, `None` is returned.
    pub fn run_from<W>(&self, origin: &Q, word: W) -> Option<&Q>
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        let mut current = self.states.get(self.position(origin)?)?;
        for a in word {
            current = self.successor(current, a.borrow())?;
        }
        Some(current)
    }

    /// Runs `word` from the start state, see [`Self::run_from`].
    pub fn run<W>(&self, word: W) -> Option<&Q>
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        self.run_from(&self.start, word)
    }

    /// Returns true if and only if the run on `word` reaches an accepting state.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        self.run(word).map(|q| self.is_accepting(q)).unwrap_or(false)
    }

    /// Turns `self` into a complete automaton by redirecting every missing transition to `sink`.
    /// If `sink` is not yet a state, it is added as a rejecting state which loops on every symbol.
    /// An existing state keeps its acceptance. The accepted language does not change as long as
    /// `sink` is new or cannot reach an accepting state.
    pub fn complete_with(mut self, sink: Q) -> Self {
        if !self.contains_state(&sink) {
            self.positions.insert(sink.clone(), self.states.len());
            self.states.push(sink.clone());
        }
        let missing: Vec<(Q, S)> = self
            .states
            .iter()
            .flat_map(|p| self.alphabet.iter().map(move |a| (p, a)))
            .filter(|(p, a)| self.successor(p, a).is_none())
            .map(|(p, a)| (p.clone(), a.clone()))
            .collect();
        trace!(
            "completing automaton with {} transitions into {}",
            missing.len(),
            sink.show()
        );
        for key in missing {
            self.transitions.insert(key, sink.clone());
        }
        self
    }

    /// Returns a string representation of the transition table. The start state is marked with
    /// `→`, accepting states with `*` and missing transitions are shown as `-`.
    pub fn transition_table(&self) -> String {
        use owo_colors::OwoColorize;

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.iter().map(|a| a.show())),
        );
        for q in &self.states {
            let mut label = q.show();
            if self.is_accepting(q) {
                label = format!("*{label}").green().to_string();
            }
            if q == &self.start {
                label = format!("→{label}");
            }
            let mut row = vec![label];
            row.extend(self.alphabet.iter().map(|a| self.transition(q, a).show()));
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    pub(crate) fn into_parts(self) -> (Vec<Q>, Vec<S>, Q, Set<Q>, Map<(Q, S), Q>) {
        (
            self.states,
            self.alphabet,
            self.start,
            self.accepting,
            self.transitions,
        )
    }
}

impl<Q: StateId, S: Symbol> Display for Automaton<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}

impl<Q: StateId, S: Symbol> Debug for Automaton<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DFA with {} states, start {}, accepting {}\n{}",
            self.size(),
            self.start.show(),
            Q::show_collection(self.accepting_states()),
            self.transition_table()
        )
    }
}
