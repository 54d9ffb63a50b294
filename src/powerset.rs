use std::ops::Bound;

use tracing::{debug, trace};

use crate::{
    math::{OrderedSet, Set, StateSet},
    relation::TransitionRelation,
    State, Symbol,
};

/// A single transition of the deterministic automaton produced by the subset construction.
/// It leads from the set of states `source` to the set of states `target` on `symbol`.
///
/// Edges are ordered by source first, then symbol and finally target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowersetEdge<Q: State, S: Symbol> {
    source: StateSet<Q>,
    symbol: S,
    target: StateSet<Q>,
}

impl<Q: State, S: Symbol> PowersetEdge<Q, S> {
    /// Creates a new edge from `source` to `target` on `symbol`.
    pub fn new(source: StateSet<Q>, symbol: S, target: StateSet<Q>) -> Self {
        Self {
            source,
            symbol,
            target,
        }
    }

    /// The set of states in which the edge originates.
    pub fn source(&self) -> &StateSet<Q> {
        &self.source
    }

    /// The symbol on which the edge is taken.
    pub fn symbol(&self) -> &S {
        &self.symbol
    }

    /// The set of states that the edge leads to.
    pub fn target(&self) -> &StateSet<Q> {
        &self.target
    }

    /// Decomposes the edge into a `(source, symbol, target)` triple.
    pub fn into_triple(self) -> (StateSet<Q>, S, StateSet<Q>) {
        (self.source, self.symbol, self.target)
    }
}

impl<Q: State, S: Symbol> From<(StateSet<Q>, S, StateSet<Q>)> for PowersetEdge<Q, S> {
    fn from((source, symbol, target): (StateSet<Q>, S, StateSet<Q>)) -> Self {
        Self::new(source, symbol, target)
    }
}

/// The deterministic automaton obtained from [`TransitionRelation::powerset_construction`].
/// Its states are [`StateSet`]s of the original relation and its transitions are the
/// [`PowersetEdge`]s reachable from the initial state set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Powerset<Q: State, S: Symbol> {
    initial: StateSet<Q>,
    edges: OrderedSet<PowersetEdge<Q, S>>,
}

impl<Q: State, S: Symbol> Powerset<Q, S> {
    /// The initial state set, which is the epsilon closure of the start state.
    pub fn initial(&self) -> &StateSet<Q> {
        &self.initial
    }

    /// Iterates over all edges, ordered by source, symbol and target.
    pub fn edges(&self) -> impl Iterator<Item = &PowersetEdge<Q, S>> + '_ {
        self.edges.iter()
    }

    /// Returns the number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if there are no edges, which happens when no symbol can be read
    /// from the initial state set.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` if the given edge is part of `self`.
    pub fn contains(&self, edge: &PowersetEdge<Q, S>) -> bool {
        self.edges.contains(edge)
    }

    /// Returns all state sets that occur, i.e. the initial one as well as every source
    /// and target of an edge.
    pub fn states(&self) -> OrderedSet<&StateSet<Q>> {
        std::iter::once(&self.initial)
            .chain(self.edges.iter().flat_map(|e| [&e.source, &e.target]))
            .collect()
    }

    /// Returns all symbols that appear on some edge.
    pub fn alphabet(&self) -> OrderedSet<&S> {
        self.edges.iter().map(|e| &e.symbol).collect()
    }

    /// Returns the state set that is reached from `from` on `symbol`, if any. As the
    /// automaton is deterministic, there is at most one.
    pub fn successor(&self, from: &StateSet<Q>, symbol: &S) -> Option<&StateSet<Q>> {
        // the empty set is the smallest possible target, so this is the first edge
        // with the given source and symbol
        let lower = PowersetEdge::new(from.clone(), symbol.clone(), StateSet::new());
        self.edges
            .range((Bound::Included(lower), Bound::Unbounded))
            .next()
            .filter(|e| &e.source == from && &e.symbol == symbol)
            .map(|e| &e.target)
    }

    /// Runs `word` from the initial state set and returns the state set that is reached,
    /// or `None` if some symbol cannot be read along the way.
    pub fn run<'w, W>(&self, word: W) -> Option<&StateSet<Q>>
    where
        W: IntoIterator<Item = &'w S>,
        S: 'w,
    {
        word.into_iter()
            .try_fold(&self.initial, |current, symbol| self.successor(current, symbol))
    }

    /// Decides whether `word` is accepted, where a state set is accepting if it contains
    /// at least one state for which `accepting` returns `true`.
    pub fn accepts<'w, W, F>(&self, word: W, accepting: F) -> bool
    where
        W: IntoIterator<Item = &'w S>,
        S: 'w,
        F: Fn(&Q) -> bool,
    {
        self.run(word)
            .map(|reached| reached.iter().any(accepting))
            .unwrap_or(false)
    }

    /// Consumes `self` and returns the initial state set together with all edges.
    pub fn into_parts(self) -> (StateSet<Q>, OrderedSet<PowersetEdge<Q, S>>) {
        (self.initial, self.edges)
    }
}

impl<'a, Q: State, S: Symbol> IntoIterator for &'a Powerset<Q, S> {
    type Item = &'a PowersetEdge<Q, S>;
    type IntoIter = std::collections::btree_set::Iter<'a, PowersetEdge<Q, S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

impl<Q: State, S: Symbol> TransitionRelation<Q, S> {
    /// Performs the subset construction starting in `start`. The initial state set is the
    /// epsilon closure of `start`. For every state set `V` that is discovered and every
    /// symbol `a` on which some state of `V` has a transition, the edge from `V` on `a` to
    /// the epsilon closure of the `a`-successors of `V` is recorded.
    ///
    /// Each pair of state set and symbol is processed exactly once, so this terminates
    /// after at most `2^n * |alphabet|` steps for `n` states.
    pub fn powerset_construction(&self, start: Q) -> Powerset<Q, S> {
        let initial = self.epsilon_closure_of(&start);

        let mut queue: Vec<(StateSet<Q>, S)> = self
            .edges_from_set(&initial)
            .into_iter()
            .map(|symbol| (initial.clone(), symbol))
            .collect();
        let mut seen: Set<(StateSet<Q>, S)> = Set::default();
        let mut edges = OrderedSet::new();

        while let Some(pair) = queue.pop() {
            if !seen.insert(pair.clone()) {
                continue;
            }
            let (source, symbol) = pair;

            let target = self.epsilon_closure(&self.next_states_from_set(&source, &symbol));
            trace!("{:?} --{:?}--> {:?}", source, symbol, target);

            for next_symbol in self.edges_from_set(&target) {
                let next = (target.clone(), next_symbol);
                if !seen.contains(&next) {
                    queue.push(next);
                }
            }
            edges.insert(PowersetEdge::new(source, symbol, target));
        }

        let powerset = Powerset { initial, edges };
        debug!(
            "subset construction from {:?} produced {} state sets and {} edges",
            start,
            powerset.states().len(),
            powerset.len()
        );
        powerset
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn example() -> TransitionRelation<u32, char> {
        RelationBuilder::default()
            .epsilon(' ')
            .with_transitions([
                (1, ' ', 2),
                (2, ' ', 3),
                (2, 'c', 10),
                (4, 'a', 5),
                (4, 'a', 6),
                (6, ' ', 7),
                (1, 'b', 4),
            ])
            .build()
            .unwrap()
    }

    fn edge<const N: usize, const M: usize>(
        source: [u32; N],
        symbol: char,
        target: [u32; M],
    ) -> PowersetEdge<u32, char> {
        PowersetEdge::new(StateSet::from(source), symbol, StateSet::from(target))
    }

    #[test_log::test]
    fn example_construction() {
        let rel = example();
        let dfa = rel.powerset_construction(1);

        assert_eq!(dfa.initial(), &StateSet::from([1, 2, 3]));
        assert!(dfa.contains(&edge([1, 2, 3], 'b', [4])));
        assert!(dfa.contains(&edge([4], 'a', [5, 6, 7])));
        assert!(dfa.contains(&edge([1, 2, 3], 'c', [10])));
        assert_eq!(dfa.len(), 3);
        assert_eq!(dfa.states().len(), 4);
    }

    #[test]
    fn construction_is_deterministic() {
        let rel = example();
        assert_eq!(rel.powerset_construction(1), rel.powerset_construction(1));
        assert_eq!(rel.powerset_construction(4), rel.powerset_construction(4));
    }

    #[test]
    fn unreachable_states_are_never_sources() {
        let mut rel = example();
        rel.add(20, 'a', 1);
        rel.add(21, ' ', 20);

        let dfa = rel.powerset_construction(1);
        for e in &dfa {
            assert!(!e.source().contains(&20));
            assert!(!e.source().contains(&21));
        }
        assert_eq!(dfa, example().powerset_construction(1));
    }

    #[test]
    fn start_without_outgoing_symbols() {
        let rel = example();
        let dfa = rel.powerset_construction(7);
        assert!(dfa.is_empty());
        assert_eq!(dfa.initial(), &StateSet::from([7]));
        assert_eq!(dfa.states().len(), 1);

        let dfa = rel.powerset_construction(99);
        assert!(dfa.is_empty());
        assert_eq!(dfa.initial(), &StateSet::from([99]));
    }

    #[test]
    fn loops_terminate_and_merge_state_sets() {
        // 0 -a-> {0, 1}, 1 -b-> 0, 1 -ε-> 2, 2 -a-> 2
        let rel = RelationBuilder::default()
            .epsilon('ε')
            .with_transitions([
                (0, 'a', 0),
                (0, 'a', 1),
                (1, 'b', 0),
                (1, 'ε', 2),
                (2, 'a', 2),
            ])
            .build()
            .unwrap();
        let dfa = rel.powerset_construction(0);

        assert!(dfa.contains(&edge([0], 'a', [0, 1, 2])));
        assert!(dfa.contains(&edge([0, 1, 2], 'a', [0, 1, 2])));
        assert!(dfa.contains(&edge([0, 1, 2], 'b', [0])));
        assert_eq!(dfa.len(), 3);
    }

    #[test]
    fn successors_and_runs() {
        let rel = example();
        let dfa = rel.powerset_construction(1);
        let initial = dfa.initial().clone();

        assert_eq!(dfa.successor(&initial, &'b'), Some(&StateSet::from([4])));
        assert_eq!(dfa.successor(&initial, &'a'), None);
        assert_eq!(dfa.successor(&StateSet::from([4]), &'b'), None);

        assert_eq!(dfa.run(&['b', 'a']), Some(&StateSet::from([5, 6, 7])));
        assert_eq!(dfa.run(&[]), Some(&initial));
        assert_eq!(dfa.run(&['b', 'b']), None);

        assert!(dfa.accepts(&['b', 'a'], |q| *q == 7));
        assert!(!dfa.accepts(&['c'], |q| *q == 7));
        assert!(!dfa.accepts(&['c', 'c'], |_| true));
    }

    #[test]
    fn each_source_and_symbol_occurs_once() {
        let rel = example();
        let dfa = rel.powerset_construction(1);
        let pairs: Vec<_> = dfa.edges().map(|e| (e.source(), e.symbol())).collect();
        let unique: std::collections::BTreeSet<_> = pairs.iter().collect();
        assert_eq!(pairs.len(), unique.len());
        assert_eq!(
            dfa.alphabet().into_iter().copied().collect::<Vec<_>>(),
            vec!['a', 'b', 'c']
        );
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_relations_are_well_formed() {
        use crate::random::generate_random_relation;

        for seed in 0..25 {
            let rel = generate_random_relation(seed, 8, 3, 0.2, 0.1);
            let dfa = rel.powerset_construction(0);
            assert_eq!(dfa, rel.powerset_construction(0));

            let targets: std::collections::BTreeSet<_> =
                dfa.edges().map(|e| e.target()).collect();
            for e in dfa.edges() {
                assert!(e.source() == dfa.initial() || targets.contains(e.source()));
                assert_eq!(&rel.epsilon_closure(e.target()), e.target());
                assert_eq!(dfa.successor(e.source(), e.symbol()), Some(e.target()));
            }
            for state in rel.states() {
                let closure = rel.epsilon_closure_of(&state);
                assert!(closure.contains(&state));
                assert_eq!(rel.epsilon_closure(&closure), closure);
            }
        }
    }
}
