use crate::{State, Symbol};

use super::{RelationError, TransitionRelation};

/// Whether the builder has been told which symbol (if any) denotes epsilon.
#[derive(Debug, Clone)]
enum EpsilonChoice<S> {
    Unset,
    Symbol(S),
    Absent,
}

/// Helper struct for the construction of a [`TransitionRelation`]. It collects transitions
/// and epsilon transitions and only classifies them once [`RelationBuilder::build`] is
/// called, so the order in which the epsilon symbol and the transitions are given does not
/// matter. Building fails if no decision about the epsilon symbol has been made.
///
/// # Example
///
/// We want to create a relation over states `1` to `4` in which `' '` stands for epsilon,
/// state `1` has an epsilon transition to `2` and `2` moves to `4` on symbol `'a'`.
/// ```
/// use powerset::prelude::*;
///
/// let relation = RelationBuilder::default()
///     .with_transitions([(1, ' ', 2), (2, 'a', 4)])
///     .epsilon(' ')
///     .build()
///     .unwrap();
/// assert_eq!(relation.epsilon_closure_of(&1), StateSet::from([1, 2]));
///
/// let unconfigured = RelationBuilder::default()
///     .with_transitions([(1, ' ', 2)])
///     .build();
/// assert_eq!(unconfigured.unwrap_err(), RelationError::MissingEpsilon);
/// ```
#[derive(Debug, Clone)]
pub struct RelationBuilder<Q, S> {
    epsilon: EpsilonChoice<S>,
    transitions: Vec<(Q, S, Q)>,
    epsilon_transitions: Vec<(Q, Q)>,
}

impl<Q, S> Default for RelationBuilder<Q, S> {
    fn default() -> Self {
        Self {
            epsilon: EpsilonChoice::Unset,
            transitions: vec![],
            epsilon_transitions: vec![],
        }
    }
}

impl<Q: State, S: Symbol> RelationBuilder<Q, S> {
    /// Declares `symbol` to be the epsilon symbol.
    pub fn epsilon(mut self, symbol: S) -> Self {
        self.epsilon = EpsilonChoice::Symbol(symbol);
        self
    }

    /// Declares that no symbol is reserved for epsilon.
    pub fn without_epsilon(mut self) -> Self {
        self.epsilon = EpsilonChoice::Absent;
        self
    }

    /// Adds a list of transitions given as `(source, symbol, target)` triples.
    pub fn with_transitions<I: IntoIterator<Item = (Q, S, Q)>>(mut self, iter: I) -> Self {
        self.transitions.extend(iter);
        self
    }

    /// Adds a single transition.
    pub fn transition(mut self, from: Q, symbol: S, to: Q) -> Self {
        self.transitions.push((from, symbol, to));
        self
    }

    /// Adds a list of epsilon transitions given as `(source, target)` pairs. These are
    /// epsilon transitions regardless of the configured epsilon symbol.
    pub fn with_epsilon_transitions<I: IntoIterator<Item = (Q, Q)>>(mut self, iter: I) -> Self {
        self.epsilon_transitions.extend(iter);
        self
    }

    /// Builds the [`TransitionRelation`], failing with [`RelationError::MissingEpsilon`] if
    /// neither [`Self::epsilon`] nor [`Self::without_epsilon`] was called.
    pub fn build(self) -> Result<TransitionRelation<Q, S>, RelationError> {
        let mut relation = match self.epsilon {
            EpsilonChoice::Unset => return Err(RelationError::MissingEpsilon),
            EpsilonChoice::Symbol(symbol) => TransitionRelation::new(symbol),
            EpsilonChoice::Absent => TransitionRelation::without_epsilon(),
        };
        for (from, symbol, to) in self.transitions {
            relation.add(from, symbol, to);
        }
        for (from, to) in self.epsilon_transitions {
            relation.add_epsilon(from, to);
        }
        Ok(relation)
    }
}
