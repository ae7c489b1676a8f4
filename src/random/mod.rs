use tracing::debug;

use crate::Automaton;

/// Generate a random automaton with `size` states (at least one) over an alphabet of `symbols` letters
/// starting at `'a'`. The states are `0..size` and `0` is the start state. The algorithm is as follows:
/// 1. Every state is made accepting with probability one half.
/// 2. For each state and each symbol, with probability `missing` no transition is added, otherwise a
///    target is drawn uniformly from all states.
///
/// Note that depending on the drawn transitions, there may be unreachable states.
pub fn generate_random_automaton(symbols: usize, size: usize, missing: f64) -> Automaton<usize, char> {
    generate_with(&mut fastrand::Rng::new(), symbols, size, missing)
}

/// Works as [`generate_random_automaton`], but the outcome is determined by `seed`.
pub fn generate_random_automaton_seeded(
    symbols: usize,
    size: usize,
    missing: f64,
    seed: u64,
) -> Automaton<usize, char> {
    generate_with(&mut fastrand::Rng::with_seed(seed), symbols, size, missing)
}

/// Returns the first `symbols` lowercase letters, wrapping around after `'z'`.
fn letters(symbols: usize) -> impl Iterator<Item = char> {
    (0..symbols).map(|i| (b'a' + (i % 26) as u8) as char)
}

fn generate_with(
    rng: &mut fastrand::Rng,
    symbols: usize,
    size: usize,
    missing: f64,
) -> Automaton<usize, char> {
    let size = size.max(1);
    let alphabet: Vec<char> = letters(symbols.min(26)).collect();

    let accepting: Vec<usize> = (0..size).filter(|_| rng.bool()).collect();
    let mut transitions = vec![];
    for q in 0..size {
        for &a in &alphabet {
            if rng.f64() < missing {
                continue;
            }
            transitions.push(((q, a), rng.usize(..size)));
        }
    }
    debug!(
        "generated random automaton with {size} states, {} accepting and {} transitions",
        accepting.len(),
        transitions.len()
    );

    Automaton::new(0..size, alphabet, 0, accepting, transitions)
}
