use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{
    math::StateSet,
    powerset::{Powerset, PowersetEdge},
    State, Symbol,
};

/// Helper trait which can be used to display states, symbols and the results of the subset
/// construction in a human readable way.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state `3` this should be `3`,
    /// for a set of states `{1,2,3}` and for an edge `{1,2,3}, b, {4}`.
    fn show(&self) -> String;

    /// Show a collection of the thing. The default joins the individual representations
    /// with commas and wraps them in braces, so a collection of states becomes `{q0,q1}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(","))
    }
}

macro_rules! impl_show_via_to_string {
    ($($ty:ty),*) => {
        $(
            impl Show for $ty {
                fn show(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_show_via_to_string!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char, bool, String);

impl Show for &str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<Q: State + Show> Show for StateSet<Q> {
    fn show(&self) -> String {
        Q::show_collection(self.iter())
    }
}

impl<Q: State + Show, S: Symbol + Show> Show for PowersetEdge<Q, S> {
    fn show(&self) -> String {
        format!(
            "{}, {}, {}",
            self.source().show(),
            self.symbol().show(),
            self.target().show()
        )
    }
}

impl<Q: State + Show, S: Symbol + Show> std::fmt::Display for Powerset<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for edge in self.edges() {
            writeln!(f, "{}", edge.show())?;
        }
        Ok(())
    }
}

impl<Q: State + Show, S: Symbol + Show> Powerset<Q, S> {
    /// Returns a string representation of the transition table. There is one row for
    /// each state set and one column for each symbol, missing transitions are shown as `-`.
    /// The row of the initial state set is highlighted.
    pub fn transition_table(&self) -> String {
        let alphabet = self.alphabet();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(alphabet.iter().map(|s| s.show())),
        );
        for state in self.states() {
            let label = if state == self.initial() {
                format!("→ {}", state.show()).bold().to_string()
            } else {
                state.show()
            };
            let row = std::iter::once(label).chain(alphabet.iter().map(|&sym| {
                self.successor(state, sym)
                    .map(|target| target.show())
                    .unwrap_or_else(|| "-".to_string())
            }));
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
