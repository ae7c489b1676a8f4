pub(crate) mod partition_refinement;
pub(crate) mod quotient;

use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::error::MalformedAutomatonError;
use crate::math::{Bijection, Map, Partition};
use crate::{Automaton, Show, StateId, Symbol};

use self::partition_refinement::Refinement;

/// Determines which member of an equivalence class stands for the whole class in the minimized automaton.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub enum RepresentativeChoice {
    /// The smallest member with respect to the order on state identifiers.
    #[default]
    Smallest,
    /// The member that comes first in the list of states.
    FirstListed,
}

/// Configures [`Automaton::minimize_with`].
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct MinimizationConfig {
    /// How representatives are picked.
    pub representative: RepresentativeChoice,
    /// Whether unreachable states are removed before the partition is refined.
    pub prune_first: bool,
}

impl MinimizationConfig {
    /// Sets the way in which representatives are picked.
    pub fn with_representative(mut self, representative: RepresentativeChoice) -> Self {
        self.representative = representative;
        self
    }

    /// Sets whether the automaton is pruned first.
    pub fn prune_first(mut self, prune_first: bool) -> Self {
        self.prune_first = prune_first;
        self
    }
}

/// A class of mutually equivalent states of the original automaton.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct EquivalenceClass<Q> {
    members: Vec<Q>,
    representative: Q,
    accepting: bool,
}

impl<Q: StateId> EquivalenceClass<Q> {
    /// The members of the class, in the order of the original states.
    pub fn members(&self) -> &[Q] {
        &self.members
    }

    /// The state that replaces all members in the minimized automaton.
    pub fn representative(&self) -> &Q {
        &self.representative
    }

    /// Whether the members of the class are accepting. All members agree on this.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Returns true if the class contains more than one state, i.e. something was merged.
    pub fn is_merge(&self) -> bool {
        self.members.len() > 1
    }

    /// Returns true if `q` is a member of the class.
    pub fn contains(&self, q: &Q) -> bool {
        self.members.contains(q)
    }
}

impl<Q: StateId> Show for EquivalenceClass<Q> {
    fn show(&self) -> String {
        format!(
            "{} -> {}",
            Q::show_collection(self.members.iter()),
            self.representative.show()
        )
    }
}

/// Documents which states were proven equivalent during minimization, together with some
/// information about the run of the refinement.
#[derive(Debug, Clone)]
pub struct EquivalenceReport<Q: StateId> {
    classes: Vec<EquivalenceClass<Q>>,
    representatives: Bijection<usize, Q>,
    class_of: Map<Q, usize>,
    group_counts: Vec<usize>,
}

impl<Q: StateId> EquivalenceReport<Q> {
    pub(crate) fn new<S: Symbol>(
        automaton: &Automaton<Q, S>,
        refinement: Refinement,
        choice: RepresentativeChoice,
    ) -> Self {
        let states = automaton.states();
        let classes: Vec<_> = refinement
            .groups
            .iter()
            .filter_map(|group| {
                let members: Vec<Q> = group.iter().map(|&i| states[i].clone()).collect();
                let representative = match choice {
                    RepresentativeChoice::Smallest => members.iter().min(),
                    RepresentativeChoice::FirstListed => members.first(),
                }?
                .clone();
                let accepting = automaton.is_accepting(&representative);
                Some(EquivalenceClass {
                    members,
                    representative,
                    accepting,
                })
            })
            .collect();

        let mut representatives = Bijection::new();
        let mut class_of = Map::default();
        for (id, class) in classes.iter().enumerate() {
            representatives.insert(id, class.representative.clone());
            class_of.extend(class.members.iter().map(|q| (q.clone(), id)));
        }

        Self {
            classes,
            representatives,
            class_of,
            group_counts: refinement.group_counts,
        }
    }

    /// All classes, ordered by the position of their first member in the original list of states.
    pub fn classes(&self) -> &[EquivalenceClass<Q>] {
        &self.classes
    }

    /// Returns the number of classes, which is the number of states of the minimized automaton.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns the class with the given id, if it exists.
    pub fn class(&self, id: usize) -> Option<&EquivalenceClass<Q>> {
        self.classes.get(id)
    }

    /// Returns the id of the class containing the original state `q`.
    pub fn class_id_of(&self, q: &Q) -> Option<usize> {
        self.class_of.get(q).copied()
    }

    /// Returns the class containing the original state `q`.
    pub fn class_of(&self, q: &Q) -> Option<&EquivalenceClass<Q>> {
        self.class_id_of(q).and_then(|id| self.class(id))
    }

    /// Returns the representative that replaces the original state `q`.
    pub fn representative_of(&self, q: &Q) -> Option<&Q> {
        self.class_id_of(q)
            .and_then(|id| self.representatives.get_by_left(&id))
    }

    /// Returns the id of the class that is represented by `q`, if `q` is a representative.
    pub fn class_id_of_representative(&self, q: &Q) -> Option<usize> {
        self.representatives.get_by_right(q).copied()
    }

    /// Gives access to the bijection between class ids and representatives.
    pub fn representatives(&self) -> &Bijection<usize, Q> {
        &self.representatives
    }

    /// Returns true if `p` and `q` were found to be equivalent.
    pub fn equivalent(&self, p: &Q, q: &Q) -> bool {
        match (self.class_id_of(p), self.class_id_of(q)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    /// Iterates over the classes that contain more than one state.
    pub fn merged_classes(&self) -> impl Iterator<Item = &EquivalenceClass<Q>> + '_ {
        self.classes.iter().filter(|c| c.is_merge())
    }

    /// The number of groups before the first and after every round of refinement.
    pub fn group_counts(&self) -> &[usize] {
        &self.group_counts
    }

    /// The number of refinement rounds, including the last one which confirmed stability.
    pub fn rounds(&self) -> usize {
        self.group_counts.len().saturating_sub(1)
    }

    /// Returns the classes as a [`Partition`] of the original states.
    pub fn partition(&self) -> Partition<Q> {
        Partition::new(self.classes.iter().map(|c| c.members.iter().cloned()))
    }
}

impl<Q: StateId> Display for EquivalenceReport<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use owo_colors::OwoColorize;

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Equivalent states", "Representative"]);
        for class in &self.classes {
            builder.push_record([
                Q::show_collection(class.members.iter()),
                class.representative.show().bold().to_string(),
            ]);
        }
        write!(
            f,
            "{}",
            builder
                .build()
                .with(tabled::settings::Style::rounded())
        )
    }
}

/// The result of minimizing an automaton.
#[derive(Debug, Clone)]
pub struct Minimized<Q: StateId, S: Symbol> {
    /// The quotient automaton, whose states are the representatives.
    pub automaton: Automaton<Q, S>,
    /// The classes of equivalent states that were collapsed.
    pub report: EquivalenceReport<Q>,
}

impl<Q: StateId, S: Symbol> Minimized<Q, S> {
    /// Drops the report and returns only the minimized automaton.
    pub fn into_automaton(self) -> Automaton<Q, S> {
        self.automaton
    }
}

impl<Q: StateId, S: Symbol> Automaton<Q, S> {
    /// Merges all states that no input word can separate, using Moore's partition refinement
    /// algorithm and picking the smallest member of each class as its representative. Unreachable
    /// states are not removed, they end up in classes of their own or are merged with equivalent
    /// reachable states. Use [`Self::reduce`] to prune first.
    ///
    /// Fails if `self` is malformed, in particular if the start state is not a state.
    ///
    /// # Example
    /// ```
    /// use dfa_minimize::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::new()
    ///     .with_accepting(["q1", "q2"])
    ///     .with_transitions([
    ///         ("q0", 'a', "q1"),
    ///         ("q1", 'a', "q2"),
    ///         ("q2", 'a', "q1"),
    ///     ])
    ///     .into_automaton("q0")
    ///     .unwrap();
    /// let minimized = dfa.minimize().unwrap();
    /// assert_eq!(minimized.automaton.states(), &["q0", "q1"]);
    /// assert_eq!(minimized.report.representative_of(&"q2"), Some(&"q1"));
    /// ```
    pub fn minimize(self) -> Result<Minimized<Q, S>, MalformedAutomatonError> {
        self.minimize_with(MinimizationConfig::default())
    }

    /// Minimizes `self` as configured by `config`, see [`Self::minimize`].
    pub fn minimize_with(
        self,
        config: MinimizationConfig,
    ) -> Result<Minimized<Q, S>, MalformedAutomatonError> {
        let automaton = if config.prune_first {
            self.prune()?
        } else {
            self.validate()?;
            self
        };

        let refinement = partition_refinement::moore_partition_refinement(&automaton);
        let report = EquivalenceReport::new(&automaton, refinement, config.representative);
        debug!(
            "minimization found {} classes among {} states after {} rounds, merged {}",
            report.num_classes(),
            automaton.size(),
            report.rounds(),
            report.merged_classes().map(|c| c.show()).join(", ")
        );

        let automaton = quotient::quotient(automaton, &report);
        Ok(Minimized { automaton, report })
    }

    /// Removes unreachable states and then minimizes, which yields the smallest automaton accepting
    /// the same language.
    pub fn reduce(self) -> Result<Minimized<Q, S>, MalformedAutomatonError> {
        self.minimize_with(MinimizationConfig::default().prune_first(true))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    /// All words over `alphabet` of length at most `max_len`, shortest first.
    fn words_up_to<S: Clone>(alphabet: &[S], max_len: usize) -> Vec<Vec<S>> {
        let mut words = vec![vec![]];
        let mut frontier: Vec<Vec<S>> = vec![vec![]];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|word| {
                    alphabet.iter().map(move |a| {
                        let mut extended = word.clone();
                        extended.push(a.clone());
                        extended
                    })
                })
                .collect();
            words.extend(frontier.iter().cloned());
        }
        words
    }

    fn scenario_a() -> Automaton<&'static str, char> {
        AutomatonBuilder::new()
            .with_accepting(["q2"])
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q0", 'b', "q0"),
                ("q1", 'a', "q2"),
                ("q1", 'b', "q0"),
                ("q2", 'a', "q2"),
                ("q2", 'b', "q2"),
            ])
            .into_automaton("q0")
            .unwrap()
    }

    fn scenario_b(states: [&'static str; 5]) -> Automaton<&'static str, char> {
        AutomatonBuilder::new()
            .with_states(states)
            .with_accepting(["q2"])
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q0", 'b', "q3"),
                ("q1", 'a', "q2"),
                ("q1", 'b', "q4"),
                ("q3", 'a', "q2"),
                ("q3", 'b', "q4"),
                ("q2", 'a', "q2"),
                ("q2", 'b', "q2"),
                ("q4", 'a', "q4"),
                ("q4", 'b', "q4"),
            ])
            .into_automaton("q0")
            .unwrap()
    }

    #[test_log::test]
    fn minimal_automaton_is_left_alone() {
        let minimized = scenario_a().minimize().unwrap();
        assert_eq!(minimized.report.num_classes(), 3);
        assert_eq!(minimized.report.merged_classes().count(), 0);
        assert_eq!(minimized.report.group_counts(), &[2, 3, 3]);
        assert_eq!(minimized.report.rounds(), 2);
        assert!(minimized.automaton.is_isomorphic(&scenario_a()));
        assert_eq!(minimized.automaton, scenario_a());
    }

    #[test_log::test]
    fn identical_states_collapse() {
        let original = scenario_b(["q0", "q1", "q2", "q3", "q4"]);
        let minimized = original.clone().minimize().unwrap();
        let report = &minimized.report;

        assert_eq!(report.num_classes(), 4);
        assert!(report.equivalent(&"q1", &"q3"));
        assert!(!report.equivalent(&"q0", &"q4"));
        assert_eq!(report.representative_of(&"q3"), Some(&"q1"));
        assert_eq!(
            report.merged_classes().map(|c| c.members().to_vec()).collect_vec(),
            vec![vec!["q1", "q3"]]
        );
        assert_eq!(report.class_id_of_representative(&"q1"), report.class_id_of(&"q3"));
        assert_eq!(report.class_id_of_representative(&"q3"), None);

        let automaton = &minimized.automaton;
        assert_eq!(automaton.states(), &["q0", "q1", "q2", "q4"]);
        assert_eq!(automaton.successor(&"q0", &'b'), Some(&"q1"));
        assert_eq!(automaton.accepting_states().collect_vec(), vec![&"q2"]);
        assert!(automaton.equivalent(&original));
    }

    #[test]
    fn representative_choice_is_configurable() {
        let original = scenario_b(["q0", "q3", "q1", "q2", "q4"]);

        let smallest = original.clone().minimize().unwrap();
        assert_eq!(smallest.report.representative_of(&"q3"), Some(&"q1"));
        assert_eq!(smallest.automaton.states(), &["q0", "q1", "q2", "q4"]);

        let config =
            MinimizationConfig::default().with_representative(RepresentativeChoice::FirstListed);
        let first = original.minimize_with(config).unwrap();
        assert_eq!(first.report.representative_of(&"q1"), Some(&"q3"));
        assert_eq!(first.automaton.states(), &["q0", "q3", "q2", "q4"]);
        assert_eq!(first.automaton.successor(&"q0", &'a'), Some(&"q3"));
    }

    #[test]
    fn unreachable_states_survive_minimize_but_not_reduce() {
        let dfa = AutomatonBuilder::new()
            .with_states(["q0", "q1", "q5"])
            .with_accepting(["q1"])
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q1", 'a', "q1"),
                ("q5", 'a', "q5"),
            ])
            .into_automaton("q0")
            .unwrap();

        let minimized = dfa.clone().minimize().unwrap();
        assert_eq!(minimized.automaton.states(), &["q0", "q1", "q5"]);

        let reduced = dfa.reduce().unwrap();
        assert_eq!(reduced.automaton.states(), &["q0", "q1"]);
        assert_eq!(reduced.report.class_of(&"q5"), None);
    }

    #[test]
    fn empty_accepting_set_terminates() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q1", 'a', "q2"),
                ("q2", 'a', "q0"),
            ])
            .into_automaton("q0")
            .unwrap();
        let minimized = dfa.minimize().unwrap();
        assert_eq!(minimized.report.num_classes(), 1);
        assert_eq!(minimized.report.group_counts(), &[1, 1]);
        assert_eq!(minimized.automaton.states(), &["q0"]);
        assert_eq!(minimized.automaton.successor(&"q0", &'a'), Some(&"q0"));
        assert_eq!(minimized.automaton.accepting_states().count(), 0);

        // a hole in the table separates states even without accepting ones
        let dfa = AutomatonBuilder::new()
            .with_transitions([("q0", 'a', "q1")])
            .into_automaton("q0")
            .unwrap();
        let minimized = dfa.minimize().unwrap();
        assert_eq!(minimized.report.num_classes(), 2);
    }

    #[test]
    fn all_accepting_complete_automaton_collapses() {
        let dfa = AutomatonBuilder::new()
            .with_accepting(["q0", "q1"])
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q0", 'b', "q0"),
                ("q1", 'a', "q0"),
                ("q1", 'b', "q1"),
            ])
            .into_automaton("q0")
            .unwrap();
        let minimized = dfa.minimize().unwrap();
        assert_eq!(minimized.automaton.size(), 1);
        assert!(minimized.automaton.accepts("abba".chars()));
    }

    #[test]
    fn unknown_accepting_states_are_ignored() {
        let dfa = Automaton::new(
            ["q0", "q1"],
            ['a'],
            "q0",
            ["q1", "q8"],
            [(("q0", 'a'), "q1"), (("q1", 'a'), "q1")],
        );
        let minimized = dfa.minimize().unwrap();
        assert_eq!(minimized.report.num_classes(), 2);
        assert_eq!(minimized.report.class_of(&"q8"), None);
    }

    #[test]
    fn malformed_automaton_is_rejected() {
        let dfa = Automaton::new(["q0"], ['a'], "q1", [], [(("q0", 'a'), "q0")]);
        assert_eq!(
            dfa.minimize().unwrap_err(),
            MalformedAutomatonError::UnknownStartState {
                state: "q1".to_string()
            }
        );
    }

    #[test]
    fn minimize_is_idempotent() {
        let once = scenario_b(["q0", "q1", "q2", "q3", "q4"])
            .minimize()
            .unwrap()
            .into_automaton();
        let twice = once.clone().minimize().unwrap();
        assert_eq!(twice.report.merged_classes().count(), 0);
        assert!(twice.automaton.is_isomorphic(&once));
        assert_eq!(twice.automaton, once);
    }

    #[test]
    fn report_renders_classes() {
        let report = scenario_b(["q0", "q1", "q2", "q3", "q4"])
            .minimize()
            .unwrap()
            .report;
        let rendered = report.to_string();
        assert!(rendered.contains("Representative"));
        assert!(rendered.contains("{q1, q3}"));
        assert_eq!(report.class(1).map(|c| c.show()), Some("{q1, q3} -> q1".to_string()));
        assert!(report
            .partition()
            .same_class(&"q1", &"q3"));
    }

    #[cfg(feature = "random")]
    mod properties {
        use itertools::Itertools;

        use super::words_up_to;
        use crate::prelude::*;
        use crate::random::generate_random_automaton_seeded;

        #[test_log::test]
        fn reduction_preserves_language() {
            for seed in 0..40 {
                let dfa = generate_random_automaton_seeded(2, 7, 0.15, seed);
                let reduced = dfa.clone().reduce().unwrap().into_automaton();
                for word in words_up_to(dfa.alphabet(), 7) {
                    assert_eq!(
                        dfa.accepts(&word),
                        reduced.accepts(&word),
                        "seed {seed} disagrees on {}",
                        word.show()
                    );
                }
                assert!(reduced.equivalent(&dfa));
                assert!(reduced.unreachable_states().is_empty());
            }
        }

        #[test]
        fn merged_states_cannot_be_separated() {
            for seed in 0..40 {
                let dfa = generate_random_automaton_seeded(3, 6, 0.2, seed);
                let report = dfa.clone().minimize().unwrap().report;
                for (p, q) in dfa.states().iter().tuple_combinations() {
                    if report.equivalent(p, q) {
                        assert_eq!(
                            dfa.separate(p, q),
                            None,
                            "seed {seed}: {} and {} were merged",
                            p.show(),
                            q.show()
                        );
                    }
                }
            }
        }

        #[test]
        fn complete_automata_are_minimal() {
            for seed in 0..40 {
                let dfa = generate_random_automaton_seeded(2, 6, 0.0, seed);
                let report = dfa.clone().minimize().unwrap().report;
                for (p, q) in dfa.states().iter().tuple_combinations() {
                    if report.equivalent(p, q) {
                        continue;
                    }
                    let word = dfa
                        .separate(p, q)
                        .expect("states in different classes must be separable");
                    assert_ne!(
                        dfa.run_from(p, &word).is_some_and(|r| dfa.is_accepting(r)),
                        dfa.run_from(q, &word).is_some_and(|r| dfa.is_accepting(r)),
                    );
                }
            }
        }

        #[test]
        fn group_counts_are_monotone_and_bounded() {
            for seed in 0..40 {
                let dfa = generate_random_automaton_seeded(2, 8, 0.1, seed);
                let accepting = dfa.accepting_states().count();
                let lower = accepting.min(1) + (dfa.size() - accepting).min(1);
                let size = dfa.size();

                let report = dfa.minimize().unwrap().report;
                let counts = report.group_counts();
                assert_eq!(counts[0], lower);
                assert!(counts.windows(2).all(|w| w[0] <= w[1]));
                assert!(counts.iter().all(|&c| c <= size));
                assert_eq!(counts.last(), Some(&report.num_classes()));
            }
        }

        #[test]
        fn minimize_twice_is_isomorphic() {
            for seed in 0..40 {
                let once = generate_random_automaton_seeded(2, 8, 0.1, seed)
                    .reduce()
                    .unwrap()
                    .into_automaton();
                let twice = once.clone().reduce().unwrap().into_automaton();
                assert_eq!(once.size(), twice.size());
                assert!(once.is_isomorphic(&twice));
            }
        }
    }
}
