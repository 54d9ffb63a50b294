use thiserror::Error;
use tracing::{trace, warn};

use crate::{
    math::{Map, OrderedSet, StateSet},
    State, Symbol,
};

mod builder;
pub use builder::RelationBuilder;

mod closure;

/// Errors that arise from an inconsistent configuration of the epsilon symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    /// The relation was built without deciding whether there is an epsilon symbol.
    #[error("no epsilon symbol configured, use `epsilon` or `without_epsilon` before building")]
    MissingEpsilon,
    /// The epsilon symbol was changed after transitions had been classified with the
    /// previous configuration.
    #[error("cannot change the epsilon symbol after {0} transitions have been added")]
    EpsilonAfterTransitions(usize),
}

/// The transition relation of a nondeterministic automaton with epsilon transitions.
///
/// States of type `Q` and symbols of type `S` are opaque, the relation only compares
/// and hashes them. Transitions are stored in three indices that are kept consistent
/// by [`TransitionRelation::add`]:
/// - `next` maps a state and a (non-epsilon) symbol to the set of successor states,
/// - `epsilon` maps a state to the states reachable with a single epsilon transition,
/// - `edges` maps a state to the symbols on its outgoing (non-epsilon) transitions.
///
/// A pair `(q, a)` is a key of `next` precisely if `a` is contained in `edges[q]`.
#[derive(Clone, Debug)]
pub struct TransitionRelation<Q: State, S: Symbol> {
    epsilon_symbol: Option<S>,
    next: Map<(Q, S), StateSet<Q>>,
    epsilon: Map<Q, StateSet<Q>>,
    edges: Map<Q, OrderedSet<S>>,
    transitions: usize,
}

impl<Q: State, S: Symbol> TransitionRelation<Q, S> {
    /// Creates an empty relation in which transitions on `epsilon` are epsilon transitions.
    pub fn new(epsilon: S) -> Self {
        Self::with_epsilon_symbol(Some(epsilon))
    }

    /// Creates an empty relation that reserves no symbol for epsilon. Every transition
    /// given to [`Self::add`] is a regular one, epsilon transitions can still be inserted
    /// through [`Self::add_epsilon`].
    pub fn without_epsilon() -> Self {
        Self::with_epsilon_symbol(None)
    }

    pub(crate) fn with_epsilon_symbol(epsilon_symbol: Option<S>) -> Self {
        Self {
            epsilon_symbol,
            next: Map::default(),
            epsilon: Map::default(),
            edges: Map::default(),
            transitions: 0,
        }
    }

    /// Returns a [`RelationBuilder`], which allows collecting transitions before deciding
    /// on the epsilon symbol.
    pub fn builder() -> RelationBuilder<Q, S> {
        RelationBuilder::default()
    }

    /// Returns the symbol that marks epsilon transitions, if there is one.
    pub fn epsilon_symbol(&self) -> Option<&S> {
        self.epsilon_symbol.as_ref()
    }

    /// Sets the symbol that marks epsilon transitions. This is only possible as long as no
    /// transitions have been added, as those were already classified using the previous
    /// configuration. Setting the symbol that is already configured is always fine.
    pub fn set_epsilon(&mut self, symbol: S) -> Result<(), RelationError> {
        if self.epsilon_symbol.as_ref() == Some(&symbol) {
            return Ok(());
        }
        if self.transitions > 0 {
            warn!(
                "refusing to set epsilon symbol to {:?} with {} transitions present",
                symbol, self.transitions
            );
            return Err(RelationError::EpsilonAfterTransitions(self.transitions));
        }
        self.epsilon_symbol = Some(symbol);
        Ok(())
    }

    /// Returns `true` if `symbol` is the configured epsilon symbol.
    pub fn is_epsilon(&self, symbol: &S) -> bool {
        self.epsilon_symbol.as_ref() == Some(symbol)
    }

    /// Adds a transition from `from` to `to` on `symbol`. If `symbol` is the epsilon symbol,
    /// this becomes an epsilon transition and is invisible to [`Self::next_states`] and
    /// [`Self::edges_from`]. Adding the same transition twice has no effect.
    pub fn add(&mut self, from: Q, symbol: S, to: Q) {
        if self.is_epsilon(&symbol) {
            self.add_epsilon(from, to);
            return;
        }

        trace!("adding transition {:?} --{:?}--> {:?}", from, symbol, to);
        self.edges
            .entry(from.clone())
            .or_default()
            .insert(symbol.clone());
        if self.next.entry((from, symbol)).or_default().insert(to) {
            self.transitions += 1;
        }
    }

    /// Adds an epsilon transition from `from` to `to`.
    pub fn add_epsilon(&mut self, from: Q, to: Q) {
        trace!("adding epsilon transition {:?} --> {:?}", from, to);
        if self.epsilon.entry(from).or_default().insert(to) {
            self.transitions += 1;
        }
    }

    /// Returns the states that can be reached from `state` with a single transition
    /// on `symbol`. The set is empty if there is no such transition.
    pub fn next_states(&self, state: &Q, symbol: &S) -> StateSet<Q> {
        self.next
            .get(&(state.clone(), symbol.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the union of [`Self::next_states`] over all states in `states`.
    pub fn next_states_from_set(&self, states: &StateSet<Q>, symbol: &S) -> StateSet<Q> {
        let mut out = StateSet::new();
        for state in states {
            if let Some(successors) = self.next.get(&(state.clone(), symbol.clone())) {
                out.union_with(successors);
            }
        }
        out
    }

    /// Returns the symbols on the (non-epsilon) transitions leaving `state`.
    pub fn edges_from(&self, state: &Q) -> OrderedSet<S> {
        self.edges.get(state).cloned().unwrap_or_default()
    }

    /// Returns the symbols on the (non-epsilon) transitions leaving any of the `states`.
    pub fn edges_from_set(&self, states: &StateSet<Q>) -> OrderedSet<S> {
        states
            .iter()
            .filter_map(|state| self.edges.get(state))
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns the states that are reached from `state` with a single epsilon transition.
    pub fn epsilon_successors(&self, state: &Q) -> StateSet<Q> {
        self.epsilon.get(state).cloned().unwrap_or_default()
    }

    /// Returns all symbols that label some non-epsilon transition.
    pub fn alphabet(&self) -> OrderedSet<S> {
        self.edges.values().flatten().cloned().collect()
    }

    /// Returns every state that is the source or the target of some transition.
    pub fn states(&self) -> StateSet<Q> {
        let mut states = StateSet::new();
        for ((source, _), targets) in &self.next {
            states.insert(source.clone());
            states.union_with(targets);
        }
        for (source, targets) in &self.epsilon {
            states.insert(source.clone());
            states.union_with(targets);
        }
        states
    }

    /// Returns the number of distinct transitions, counting epsilon transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions
    }

    /// Returns `true` if no transition has been added.
    pub fn is_empty(&self) -> bool {
        self.transitions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{RelationError, TransitionRelation};
    use crate::math::{OrderedSet, StateSet};

    #[test]
    fn adding_is_idempotent() {
        let mut once = TransitionRelation::new(' ');
        once.add(1, 'a', 2);

        let mut twice = TransitionRelation::new(' ');
        twice.add(1, 'a', 2);
        twice.add(1, 'a', 2);

        assert_eq!(once.next_states(&1, &'a'), twice.next_states(&1, &'a'));
        assert_eq!(twice.next_states(&1, &'a'), StateSet::from([2]));
        assert_eq!(twice.transition_count(), 1);
    }

    #[test]
    fn epsilon_does_not_leak() {
        let mut rel = TransitionRelation::new('ε');
        rel.add(1, 'ε', 2);

        assert!(!rel.edges_from(&1).contains(&'ε'));
        assert!(rel.edges_from(&1).is_empty());
        assert!(rel.next_states(&1, &'ε').is_empty());
        assert_eq!(rel.epsilon_successors(&1), StateSet::from([2]));
        assert!(rel.alphabet().is_empty());
    }

    #[test]
    fn unknown_states_have_no_successors() {
        let rel: TransitionRelation<u32, char> = TransitionRelation::new(' ');
        assert!(rel.next_states(&7, &'a').is_empty());
        assert!(rel.edges_from(&7).is_empty());
        assert!(rel.epsilon_successors(&7).is_empty());
        assert!(rel.is_empty());
    }

    #[test]
    fn set_queries_take_unions() {
        let mut rel = TransitionRelation::new(' ');
        rel.add(1, 'a', 2);
        rel.add(1, 'b', 3);
        rel.add(4, 'a', 5);
        rel.add(4, 'c', 4);
        rel.add(6, 'a', 7);

        let states = StateSet::from([1, 4]);
        assert_eq!(rel.next_states_from_set(&states, &'a'), StateSet::from([2, 5]));
        assert_eq!(rel.next_states_from_set(&states, &'c'), StateSet::from([4]));
        assert_eq!(
            rel.edges_from_set(&states),
            OrderedSet::from(['a', 'b', 'c'])
        );
        assert!(rel.next_states_from_set(&StateSet::new(), &'a').is_empty());
    }

    #[test]
    fn edges_and_next_stay_consistent() {
        let mut rel = TransitionRelation::new(' ');
        rel.add(0, 'a', 1);
        rel.add(0, ' ', 2);
        rel.add(1, 'b', 0);
        rel.add(2, 'a', 2);

        for state in rel.states() {
            for symbol in rel.edges_from(&state) {
                assert!(!rel.next_states(&state, &symbol).is_empty());
            }
        }
        for ((state, symbol), _) in &rel.next {
            assert!(rel.edges_from(state).contains(symbol));
        }
        assert_eq!(rel.states(), StateSet::from([0, 1, 2]));
        assert_eq!(rel.alphabet(), OrderedSet::from(['a', 'b']));
        assert_eq!(rel.transition_count(), 4);
    }

    #[test]
    fn epsilon_can_only_be_set_before_transitions() {
        let mut rel = TransitionRelation::without_epsilon();
        assert_eq!(rel.epsilon_symbol(), None);
        assert_eq!(rel.set_epsilon(' '), Ok(()));
        assert_eq!(rel.epsilon_symbol(), Some(&' '));

        rel.add(0, ' ', 1);
        assert_eq!(rel.set_epsilon(' '), Ok(()));
        assert_eq!(
            rel.set_epsilon('_'),
            Err(RelationError::EpsilonAfterTransitions(1))
        );
        assert_eq!(rel.epsilon_successors(&0), StateSet::from([1]));
    }

    #[test]
    fn without_epsilon_treats_every_symbol_as_regular() {
        let mut rel = TransitionRelation::without_epsilon();
        rel.add(0u8, '\0', 1);
        rel.add_epsilon(1, 2);

        assert_eq!(rel.next_states(&0, &'\0'), StateSet::from([1]));
        assert_eq!(rel.epsilon_successors(&1), StateSet::from([2]));
        assert!(!rel.is_epsilon(&'\0'));
    }
}
