//! Grammar transitions and the actions they run

use crate::grammar::{Container, States};
use ads_core::CodecResult;
use std::fmt;

/// Semantic work run on a transition
///
/// Actions read the scratch TLV of the container and store what they
/// extract on the target object.
pub type ActionFn<S, T> = fn(&mut Container<S, T>) -> CodecResult<()>;

/// How the decoder treats the value of a TLV matched by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// The value is a run of nested TLVs: push its end offset and keep
    /// decoding inside it. Only valid for constructed tags.
    Descend,
    /// Buffer the whole value and hand it to the action.
    Value,
}

/// A named action
pub struct Action<S: States, T: 'static> {
    name: &'static str,
    run: ActionFn<S, T>,
}

impl<S: States, T: 'static> Action<S, T> {
    /// Create a named action
    pub const fn new(name: &'static str, run: ActionFn<S, T>) -> Self {
        Self { name, run }
    }

    /// Action name (for logs)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the action against a container
    pub fn run(&self, container: &mut Container<S, T>) -> CodecResult<()> {
        (self.run)(container)
    }
}

impl<S: States, T: 'static> Clone for Action<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: States, T: 'static> Copy for Action<S, T> {}

impl<S: States, T: 'static> fmt::Debug for Action<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

/// One cell of a grammar table: `(current, tag) -> (next, action)`
///
/// A `Descend` transition opens a frame for its value. By default the frame
/// is an explicit tag and must hold exactly one TLV; a SEQUENCE with several
/// fields lists the states it may close in with
/// [`closing_in`](Self::closing_in). The outermost frame of a PDU ignores
/// both and closes on the end state or the end-allowed flag.
pub struct Transition<S: States, T: 'static> {
    current: S,
    next: S,
    tag: u8,
    mode: ValueMode,
    closes_in: Option<&'static [S]>,
    action: Option<Action<S, T>>,
}

impl<S: States, T: 'static> Transition<S, T> {
    /// A transition without an action
    pub fn new(current: S, next: S, tag: u8, mode: ValueMode) -> Self {
        Self {
            current,
            next,
            tag,
            mode,
            closes_in: None,
            action: None,
        }
    }

    /// States in which the frame opened by this transition may close
    pub fn closing_in(mut self, states: &'static [S]) -> Self {
        self.closes_in = Some(states);
        self
    }

    /// Attach a named action
    pub fn with_action(mut self, name: &'static str, run: ActionFn<S, T>) -> Self {
        self.action = Some(Action::new(name, run));
        self
    }

    /// Source state
    pub fn current(&self) -> S {
        self.current
    }

    /// Destination state
    pub fn next(&self) -> S {
        self.next
    }

    /// Tag byte that selects this transition
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Value handling
    pub fn mode(&self) -> ValueMode {
        self.mode
    }

    /// Closing states declared with [`closing_in`](Self::closing_in)
    pub fn closes_in(&self) -> Option<&'static [S]> {
        self.closes_in
    }

    /// Attached action, if any
    pub fn action(&self) -> Option<&Action<S, T>> {
        self.action.as_ref()
    }
}

impl<S: States, T: 'static> Clone for Transition<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: States, T: 'static> Copy for Transition<S, T> {}

impl<S: States, T: 'static> fmt::Debug for Transition<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("current", &self.current.name())
            .field("next", &self.next.name())
            .field("tag", &format_args!("0x{:02X}", self.tag))
            .field("mode", &self.mode)
            .field("closes_in", &self.closes_in)
            .field("action", &self.action)
            .finish()
    }
}
