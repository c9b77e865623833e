//! Grammar transition tables

use crate::ber::types::is_constructed;
use crate::grammar::{States, Transition, ValueMode};

/// Immutable `(state, tag) -> transition` table for one structure type
///
/// Built once (typically in a `once_cell::sync::Lazy` static) and shared
/// read-only by every decode session.
pub struct Grammar<S: States, T: 'static> {
    name: &'static str,
    transitions: Vec<[Option<Transition<S, T>>; 256]>,
}

impl<S: States, T: 'static> Grammar<S, T> {
    /// Create an empty grammar with one row per state
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transitions: (0..S::COUNT).map(|_| [None; 256]).collect(),
        }
    }

    /// Add a transition while building the table
    ///
    /// Registering a cell twice, asking to descend into a primitive tag, or
    /// declaring closing states on a buffered value is a mistake in the
    /// grammar definition and trips a debug assertion.
    pub fn add(&mut self, transition: Transition<S, T>) -> &mut Self {
        debug_assert!(
            transition.mode() == ValueMode::Value || is_constructed(transition.tag()),
            "{}: cannot descend into primitive tag 0x{:02X}",
            self.name,
            transition.tag()
        );
        debug_assert!(
            transition.mode() == ValueMode::Descend || transition.closes_in().is_none(),
            "{}: closing states on buffered tag 0x{:02X}",
            self.name,
            transition.tag()
        );

        let cell = &mut self.transitions[transition.current().ordinal()][transition.tag() as usize];
        debug_assert!(
            cell.is_none(),
            "{}: duplicate transition from {} on tag 0x{:02X}",
            self.name,
            transition.current().name(),
            transition.tag()
        );
        *cell = Some(transition);
        self
    }

    /// Grammar name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Transition for `tag` in `state`, if the grammar has one
    pub fn transition(&self, state: S, tag: u8) -> Option<&Transition<S, T>> {
        self.transitions[state.ordinal()][tag as usize].as_ref()
    }

    /// Tags accepted in `state`
    pub fn expected_tags(&self, state: S) -> Vec<u8> {
        self.transitions[state.ordinal()]
            .iter()
            .flatten()
            .map(|transition| transition.tag())
            .collect()
    }
}

impl<S: States, T: 'static> std::fmt::Debug for Grammar<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("states", &S::COUNT)
            .finish()
    }
}
