//! Library for turning nondeterministic finite automata with epsilon transitions into
//! deterministic ones by means of the subset (powerset) construction.
//!
//! The central type is [`TransitionRelation`], which stores the transitions of a
//! nondeterministic automaton over arbitrary state and symbol types. One symbol can be
//! designated as epsilon, transitions on it are kept apart from all other transitions and
//! can be followed without reading any input. On top of the stored transitions, the relation
//! can compute epsilon closures of sets of states and perform the subset construction, which
//! yields a [`Powerset`]. Each state of the resulting deterministic automaton is a
//! [`StateSet`], i.e. a set of states of the original relation, and each transition is a
//! [`PowersetEdge`] between two such sets.
//!
//! The epsilon symbol has to be chosen explicitly, either when creating the relation with
//! [`TransitionRelation::new`] or through a [`RelationBuilder`]. Relations without epsilon
//! symbol are created with [`TransitionRelation::without_epsilon`].
//!
//! ```
//! use powerset::prelude::*;
//!
//! let mut relation = TransitionRelation::new(' ');
//! relation.add(1, ' ', 2);
//! relation.add(2, 'c', 10);
//! relation.add(1, 'b', 4);
//!
//! let dfa = relation.powerset_construction(1);
//! assert_eq!(dfa.initial(), &StateSet::from([1, 2]));
//! assert_eq!(dfa.to_string(), "{1,2}, b, {4}\n{1,2}, c, {10}\n");
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use powerset::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        math::{OrderedSet, StateSet},
        powerset::{Powerset, PowersetEdge},
        relation::{RelationBuilder, RelationError, TransitionRelation},
        show::Show,
        State, Symbol,
    };
}

/// This module contains the set and map types which are used throughout the crate.
pub mod math;
pub use math::StateSet;

/// Defines the transition relation of a nondeterministic automaton together with the
/// epsilon closure.
pub mod relation;
pub use relation::{RelationBuilder, RelationError, TransitionRelation};

/// Implements the subset construction and the deterministic automaton it produces.
pub mod powerset;
pub use powerset::{Powerset, PowersetEdge};

/// Human readable output of states, state sets and the results of the subset construction.
pub mod show;
pub use show::Show;

/// Implements the generation of random transition relations.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// A state of a nondeterministic automaton. States are opaque, they only need to be
/// comparable, orderable and hashable.
pub trait State: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> State for T {}

/// A symbol labelling the transitions of a nondeterministic automaton. Like [`State`], this
/// is implemented for every type that can be compared, ordered and hashed.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> Symbol for T {}
