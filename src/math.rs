use std::collections::BTreeSet;

use itertools::Itertools;

use crate::State;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Type alias for sets whose iteration order is determined by the ordering of the elements.
/// Unlike [`Set`], these can be hashed and compared, which is what we need whenever a set
/// is itself used as a key.
pub type OrderedSet<S> = BTreeSet<S>;

/// A deduplicated set of states of a nondeterministic automaton. In the subset construction,
/// each such set is a single state of the resulting deterministic automaton.
///
/// The states are kept ordered, so two sets containing the same states are equal, hash
/// identically and are always displayed in the same way.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet<Q>(OrderedSet<Q>);

impl<Q: State> StateSet<Q> {
    /// Creates an empty set of states.
    pub fn new() -> Self {
        Self(OrderedSet::new())
    }

    /// Creates a set that contains only `state`.
    pub fn singleton(state: Q) -> Self {
        Self(OrderedSet::from([state]))
    }

    /// Inserts `state` and returns `true` if it was not present before.
    pub fn insert(&mut self, state: Q) -> bool {
        self.0.insert(state)
    }

    /// Adds all states of `other` to `self`.
    pub fn union_with(&mut self, other: &StateSet<Q>) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Returns `true` if every state of `other` is also contained in `self`.
    pub fn is_superset(&self, other: &StateSet<Q>) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Consumes `self` and returns the underlying ordered set.
    pub fn into_inner(self) -> OrderedSet<Q> {
        self.0
    }
}

impl<Q: State> Default for StateSet<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> std::ops::Deref for StateSet<Q> {
    type Target = OrderedSet<Q>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<Q: State> FromIterator<Q> for StateSet<Q> {
    fn from_iter<I: IntoIterator<Item = Q>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<Q: State> Extend<Q> for StateSet<Q> {
    fn extend<I: IntoIterator<Item = Q>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<Q: State, const N: usize> From<[Q; N]> for StateSet<Q> {
    fn from(value: [Q; N]) -> Self {
        Self(OrderedSet::from(value))
    }
}

impl<Q> IntoIterator for StateSet<Q> {
    type Item = Q;
    type IntoIter = std::collections::btree_set::IntoIter<Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, Q> IntoIterator for &'a StateSet<Q> {
    type Item = &'a Q;
    type IntoIter = std::collections::btree_set::Iter<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<Q: std::fmt::Debug> std::fmt::Debug for StateSet<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0.iter().map(|q| format!("{:?}", q)).join(", ")
        )
    }
}
