use crate::error::MalformedAutomatonError;
use crate::math::Set;
use crate::{Automaton, StateId, Symbol};

/// Helper struct for the construction of an [`Automaton`]. It collects states, symbols, accepting
/// states and transitions, the automaton is then created by choosing a start state.
///
/// If no states are given explicitly, the states are all identifiers that are mentioned as start,
/// as accepting state or on some transition, in the order of their first appearance. Likewise, if no
/// alphabet is given, it consists of the symbols that appear on transitions. Once the states (or the
/// alphabet) are given explicitly, they are taken as is and transitions which do not fit them make
/// [`AutomatonBuilder::into_automaton`] fail.
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `['a', 'b']`, where `q0`
/// loops on `a` and moves to `q1` on `b`, while `q1` has no transitions at all. Further, `q0` should
/// be initial and `q1` should be accepting. This can be done as follows
/// ```
/// use dfa_minimize::prelude::*;
///
/// let dfa = AutomatonBuilder::new()
///     .with_accepting(["q1"])
///     .with_transitions([("q0", 'a', "q0"), ("q0", 'b', "q1")])
///     .into_automaton("q0") // q0 is the start state
///     .unwrap();
/// assert_eq!(dfa.states(), &["q0", "q1"]);
/// assert!(dfa.accepts("aab".chars()));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<Q, S> {
    states: Option<Vec<Q>>,
    alphabet: Option<Vec<S>>,
    accepting: Vec<Q>,
    transitions: Vec<(Q, S, Q)>,
}

impl<Q, S> Default for AutomatonBuilder<Q, S> {
    fn default() -> Self {
        Self {
            states: None,
            alphabet: None,
            accepting: vec![],
            transitions: vec![],
        }
    }
}

impl<Q: StateId, S: Symbol> AutomatonBuilder<Q, S> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the list of states. Calling this multiple times extends the list.
    pub fn with_states<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.states.get_or_insert_with(Vec::new).extend(states);
        self
    }

    /// Fixes the alphabet. Calling this multiple times extends the alphabet.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.alphabet.get_or_insert_with(Vec::new).extend(symbols);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Adds a list of transitions given as triples `(source, symbol, target)`. If the same pair of
    /// source and symbol appears more than once, the last transition wins.
    pub fn with_transitions<I: IntoIterator<Item = (Q, S, Q)>>(mut self, transitions: I) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Adds a single transition.
    pub fn with_transition(mut self, source: Q, symbol: S, target: Q) -> Self {
        self.transitions.push((source, symbol, target));
        self
    }

    /// Creates the automaton with `start` as its start state without checking it, see
    /// [`Automaton::validate`].
    pub fn into_automaton_unchecked(self, start: Q) -> Automaton<Q, S> {
        let states = match self.states {
            Some(states) => states,
            None => {
                let mut seen = Set::default();
                std::iter::once(&start)
                    .chain(
                        self.transitions
                            .iter()
                            .flat_map(|(p, _, q)| [p, q]),
                    )
                    .chain(self.accepting.iter())
                    .filter(|q| seen.insert(*q))
                    .cloned()
                    .collect()
            }
        };
        let alphabet = match self.alphabet {
            Some(alphabet) => alphabet,
            None => self.transitions.iter().map(|(_, a, _)| a.clone()).collect(),
        };

        Automaton::new(
            states,
            alphabet,
            start,
            self.accepting,
            self.transitions.into_iter().map(|(p, a, q)| ((p, a), q)),
        )
    }

    /// Creates the automaton with `start` as its start state. Fails if `start` is not a state or if
    /// some transition does not fit the states and the alphabet.
    pub fn into_automaton(self, start: Q) -> Result<Automaton<Q, S>, MalformedAutomatonError> {
        let automaton = self.into_automaton_unchecked(start);
        automaton.validate()?;
        Ok(automaton)
    }
}
