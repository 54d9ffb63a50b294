use tracing::debug;

use crate::relation::TransitionRelation;

/// The symbol that generated relations use for epsilon transitions.
pub const RANDOM_EPSILON: char = 'ε';

/// Generates a random relation over the states `0..size` and the symbols `'a'`, `'b'`, ...
/// (`symbols` many of them), using [`RANDOM_EPSILON`] for epsilon. The generator is seeded
/// with `seed`, so the same arguments always produce the same relation.
///
/// The algorithm is as follows:
/// 1. For every state `q`, symbol `a` and state `p`, add the transition `(q, a, p)` with
///    probability `probability`.
/// 2. For every pair of distinct states `q` and `p`, add an epsilon transition from `q` to
///    `p` with probability `epsilon_probability`.
/// 3. To make sure that not everything is unreachable, every state `q > 0` receives an
///    incoming transition from a random smaller state on a random symbol.
pub fn generate_random_relation(
    seed: u64,
    size: u32,
    symbols: usize,
    probability: f64,
    epsilon_probability: f64,
) -> TransitionRelation<u32, char> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let alphabet: Vec<char> = ('a'..='z').take(symbols.clamp(1, 26)).collect();
    let mut relation = TransitionRelation::new(RANDOM_EPSILON);

    for source in 0..size {
        for &symbol in &alphabet {
            for target in 0..size {
                if rng.f64() < probability {
                    relation.add(source, symbol, target);
                }
            }
        }
        for target in (0..size).filter(|&t| t != source) {
            if rng.f64() < epsilon_probability {
                relation.add(source, RANDOM_EPSILON, target);
            }
        }
    }

    for target in 1..size {
        let source = rng.u32(..target);
        let symbol = alphabet[rng.usize(..alphabet.len())];
        relation.add(source, symbol, target);
    }

    debug!(
        "generated random relation with {size} states and {} transitions",
        relation.transition_count()
    );
    relation
}
