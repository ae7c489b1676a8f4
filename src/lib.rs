//! Library for reducing deterministic finite automata (DFA) to their minimal form.
//!
//! An [`Automaton`] is given by an explicit transition table: a list of states, an ordered alphabet,
//! a designated start state, a set of accepting states and a (possibly partial) mapping from pairs
//! of state and symbol to a target state. A missing entry in the table simply means that the symbol
//! leads nowhere, a word that runs into such a hole is rejected. Put differently, every partial automaton
//! behaves as if all missing transitions went into an implicit rejecting sink, see [`Automaton::complete_with`]
//! for making that sink explicit.
//!
//! Reduction happens in two passes which consume the automaton and return a new one:
//! - [`Automaton::prune`] removes every state that cannot be reached from the start state, together with all
//!   transitions that touch a removed state.
//! - [`Automaton::minimize`] runs Moore's partition refinement, starting from the split into accepting and
//!   rejecting states and splitting groups until they are stable. Each final group is collapsed into a single
//!   representative state. Besides the quotient automaton, the result carries an [`EquivalenceReport`] which
//!   documents which of the original states were merged.
//!
//! [`Automaton::reduce`] chains both passes. The [`equivalence`] module provides checks that are mainly
//! useful for verifying results, like computing a shortest word separating two automata or testing whether
//! two automata are isomorphic.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfa_minimize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder},
        error::MalformedAutomatonError,
        math,
        minimization::{
            EquivalenceClass, EquivalenceReport, MinimizationConfig, Minimized,
            RepresentativeChoice,
        },
        reachability::{MinimalRepresentatives, ReachableStates},
        Show, StateId, Symbol,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Defines the errors that can be raised when an automaton is malformed.
pub mod error;

/// Defines the [`Automaton`] itself, i.e. the transition table that all algorithms operate on.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder};

/// Computes reachable states and removes the unreachable ones.
pub mod reachability;

/// Partition refinement and construction of the quotient automaton.
pub mod minimization;
pub use minimization::{EquivalenceReport, Minimized};

/// Language equivalence, separating words and isomorphism checks.
pub mod equivalence;

/// Implements the generation of random automata. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;
use std::hash::Hash;

/// A state identifier is an opaque token which can be compared, hashed and ordered. The order
/// is only used to pick representatives deterministically.
pub trait StateId: Clone + Eq + Ord + Hash + Show {}

impl<T: Clone + Eq + Ord + Hash + Show> StateId for T {}

/// A symbol of the input alphabet. The same bounds as for a [`StateId`] apply.
pub trait Symbol: Clone + Eq + Ord + Hash + Show {}

impl<T: Clone + Eq + Ord + Hash + Show> Symbol for T {}

/// Helper trait which can be used to display states, symbols and words.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example q0, q1, q2, ... This is mainly used for debugging purposes and when
    /// rendering transition tables.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

macro_rules! impl_show_via_to_string {
    ($($t:ty),*) => {
        $(
            impl Show for $t {
                fn show(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_show_via_to_string!(char, String, str, bool, u8, u16, u32, u64, usize, i32, i64);

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        if self.is_empty() {
            return "ε".to_string();
        }
        format!("\"{}\"", self.iter().map(|x| x.show()).join(""))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}
