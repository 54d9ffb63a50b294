use crate::{math::StateSet, State, Symbol};

use super::TransitionRelation;

impl<Q: State, S: Symbol> TransitionRelation<Q, S> {
    /// Computes the epsilon closure of `states`, that is the smallest set which contains
    /// all of `states` and every state that is reachable from one of them using only
    /// epsilon transitions.
    ///
    /// The traversal is a depth-first search with an explicit stack. A state is only
    /// expanded when it is visited for the first time, which makes this terminate on
    /// cyclic epsilon transitions.
    pub fn epsilon_closure(&self, states: &StateSet<Q>) -> StateSet<Q> {
        let mut visited = StateSet::new();
        let mut stack: Vec<&Q> = states.iter().collect();

        while let Some(state) = stack.pop() {
            if !visited.insert(state.clone()) {
                continue;
            }
            if let Some(successors) = self.epsilon.get(state) {
                stack.extend(successors.iter().filter(|q| !visited.contains(*q)));
            }
        }

        visited
    }

    /// Computes the epsilon closure of the single state `state`.
    pub fn epsilon_closure_of(&self, state: &Q) -> StateSet<Q> {
        self.epsilon_closure(&StateSet::singleton(state.clone()))
    }
}
