use std::collections::VecDeque;

use tracing::trace;

use crate::math::{Bijection, Set};
use crate::{Automaton, Show, StateId, Symbol};

/// A pair of positions in two automata that is explored in lockstep. `None` stands for the implicit
/// rejecting sink that a missing transition leads into.
type PairIndex = (Option<usize>, Option<usize>);

/// Breadth-first search through the product of `left` started in `l` and `right` started in `r`,
/// returning the shortest (and among those the first with respect to the order of the alphabets)
/// word on which the two disagree.
fn first_difference<P, Q, S>(
    left: &Automaton<P, S>,
    l: &P,
    right: &Automaton<Q, S>,
    r: &Q,
) -> Option<Vec<S>>
where
    P: StateId,
    Q: StateId,
    S: Symbol,
{
    let mut symbols: Vec<&S> = left.alphabet().iter().collect();
    symbols.extend(
        right
            .alphabet()
            .iter()
            .filter(|a| !left.alphabet().contains(a)),
    );

    let accepts = |(p, q): PairIndex| {
        (
            p.is_some_and(|i| left.is_accepting(&left.states()[i])),
            q.is_some_and(|i| right.is_accepting(&right.states()[i])),
        )
    };

    let origin = (left.position(l), right.position(r));
    let mut seen: Set<PairIndex> = Set::from_iter([origin]);
    let mut queue: VecDeque<(Vec<S>, PairIndex)> = VecDeque::from([(vec![], origin)]);

    while let Some((word, pair)) = queue.pop_front() {
        let (accepted_left, accepted_right) = accepts(pair);
        if accepted_left != accepted_right {
            trace!("found separating word {}", word.show());
            return Some(word);
        }
        for &a in &symbols {
            let next = (
                pair.0
                    .and_then(|i| left.successor(&left.states()[i], a))
                    .and_then(|p| left.position(p)),
                pair.1
                    .and_then(|i| right.successor(&right.states()[i], a))
                    .and_then(|q| right.position(q)),
            );
            if next == (None, None) || !seen.insert(next) {
                continue;
            }
            let mut extended = word.clone();
            extended.push(a.clone());
            queue.push_back((extended, next));
        }
    }
    None
}

impl<Q: StateId, S: Symbol> Automaton<Q, S> {
    /// Attempts to separate the state `left` from the state `right` by finding a shortest word that leads
    /// to an accepting state from one of them but not from the other. Identifiers that are not states
    /// behave like the implicit rejecting sink.
    pub fn separate(&self, left: &Q, right: &Q) -> Option<Vec<S>> {
        if left == right {
            return None;
        }
        first_difference(self, left, self, right)
    }

    /// Returns a shortest word which is accepted by exactly one of `self` and `other`, if such a word
    /// exists.
    pub fn distinguishing_word<P: StateId>(&self, other: &Automaton<P, S>) -> Option<Vec<S>> {
        first_difference(self, self.start(), other, other.start())
    }

    /// Checks whether `self` and `other` accept the same language.
    pub fn equivalent<P: StateId>(&self, other: &Automaton<P, S>) -> bool {
        self.distinguishing_word(other).is_none()
    }

    /// Checks whether the parts of `self` and `other` that are reachable from their start states
    /// are equal up to a renaming of states. Both automata have to use the same symbols.
    pub fn is_isomorphic(&self, other: &Automaton<Q, S>) -> bool {
        let symbols: Set<&S> = self.alphabet().iter().collect();
        if symbols != other.alphabet().iter().collect::<Set<_>>() {
            return false;
        }
        let (Some(l), Some(r)) = (self.position(self.start()), other.position(other.start())) else {
            return false;
        };

        let mut renaming: Bijection<usize, usize> = Bijection::new();
        renaming.insert(l, r);
        let mut queue = VecDeque::from([(l, r)]);

        while let Some((l, r)) = queue.pop_front() {
            let (p, q) = (&self.states()[l], &other.states()[r]);
            if self.is_accepting(p) != other.is_accepting(q) {
                return false;
            }
            for a in self.alphabet() {
                let successors = (
                    self.successor(p, a).and_then(|x| self.position(x)),
                    other.successor(q, a).and_then(|y| other.position(y)),
                );
                match successors {
                    (None, None) => {}
                    (Some(x), Some(y)) => {
                        match (renaming.get_by_left(&x), renaming.get_by_right(&y)) {
                            (None, None) => {
                                renaming.insert(x, y);
                                queue.push_back((x, y));
                            }
                            (Some(&y2), Some(&x2)) if y2 == y && x2 == x => {}
                            _ => return false,
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}
