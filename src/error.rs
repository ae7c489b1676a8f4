use thiserror::Error;

/// Raised when an [`Automaton`](crate::Automaton) violates one of its structural invariants. The
/// offending identifier is stored in its [`Show`](crate::Show) representation so that callers can
/// report it without the error type depending on the state or symbol type.
///
/// Anomalies that can be handled in a well-defined way are not errors: accepting identifiers that
/// are not states are ignored, missing transitions lead nowhere and transitions whose target is not
/// a state are treated as missing.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedAutomatonError {
    /// The designated start state is not a member of the state set.
    #[error("start state {state} is not a state of the automaton")]
    UnknownStartState {
        /// The start state that was given.
        state: String,
    },
    /// A transition leaves from a state which is not a member of the state set.
    #[error("transition leaves from {state}, which is not a state of the automaton")]
    UnknownTransitionSource {
        /// The source of the offending transition.
        state: String,
    },
    /// A transition is labeled with a symbol that does not belong to the alphabet.
    #[error("transition is labeled with {symbol}, which is not in the alphabet")]
    UnknownTransitionSymbol {
        /// The label of the offending transition.
        symbol: String,
    },
}
