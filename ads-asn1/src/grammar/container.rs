//! Per-decode session state

use crate::grammar::{Grammar, States, Transition};
use ads_core::{CodecError, CodecResult};

/// Where the decoder is inside the TLV currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TlvPhase {
    /// Next byte is a tag
    Tag,
    /// Next byte is the first length octet
    LengthStart,
    /// Long-form length with `remaining` octets still to read
    LengthPending { remaining: usize },
    /// Value bytes are being buffered
    Value,
}

/// The TLV currently being assembled
///
/// Reused across iterations; only the fields of the latest TLV are
/// meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tlv {
    pub(crate) tag: u8,
    pub(crate) length: usize,
    pub(crate) value: Vec<u8>,
    pub(crate) offset: usize,
}

impl Tlv {
    /// Tag byte
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Declared value length
    pub fn length(&self) -> usize {
        self.length
    }

    /// Buffered value bytes (empty for transitions that descend into the
    /// value)
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Offset of the tag byte
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn start(&mut self, tag: u8, offset: usize) {
        self.tag = tag;
        self.length = 0;
        self.value.clear();
        self.offset = offset;
    }
}

/// What must hold when a constructed value's length runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameEnd<S: 'static> {
    /// Outermost value; checked against the end state and the end-allowed
    /// flag once the whole PDU is read
    Pdu,
    /// Explicit tag around exactly one TLV
    Single,
    /// Constructed value that may only close in one of these states
    States(&'static [S]),
}

/// One open constructed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame<S: 'static> {
    end: usize,
    closing: FrameEnd<S>,
    /// State entered when the value was opened
    opened: S,
    values: usize,
}

/// Mutable state of one decode session
///
/// Holds the current grammar state, the stack of constructed values still
/// open, the scratch TLV and the object under
/// construction. Everything needed to resume after
/// [`DecodeStatus::NeedMoreData`](crate::grammar::DecodeStatus::NeedMoreData)
/// lives here, so a container must stay with its input stream and be used by
/// one decode at a time.
///
/// Offsets count bytes from the start of the PDU plus the base offset the
/// container was created with.
pub struct Container<S: States, T: 'static> {
    grammar: &'static Grammar<S, T>,
    state: S,
    pub(crate) phase: TlvPhase,
    pub(crate) tlv: Tlv,
    pub(crate) pending: Option<Transition<S, T>>,
    stack: Vec<Frame<S>>,
    base_offset: usize,
    pub(crate) offset: usize,
    grammar_end_allowed: bool,
    target: T,
}

impl<S: States, T: Default + 'static> Container<S, T> {
    /// Create a container for a fresh decode with `grammar`
    pub fn new(grammar: &'static Grammar<S, T>) -> Self {
        Self::with_base_offset(grammar, 0)
    }

    /// Create a container whose offsets start at `base_offset`
    ///
    /// Used when decoding a sub-structure that sits inside a larger PDU, so
    /// that errors report positions in the outer buffer.
    pub fn with_base_offset(grammar: &'static Grammar<S, T>, base_offset: usize) -> Self {
        Self {
            grammar,
            state: S::START,
            phase: TlvPhase::Tag,
            tlv: Tlv::default(),
            pending: None,
            stack: Vec::new(),
            base_offset,
            offset: base_offset,
            grammar_end_allowed: false,
            target: T::default(),
        }
    }

    /// Return to the initial state, dropping any partial object
    pub fn reset(&mut self) {
        self.state = S::START;
        self.phase = TlvPhase::Tag;
        self.tlv.start(0, self.base_offset);
        self.pending = None;
        self.stack.clear();
        self.offset = self.base_offset;
        self.grammar_end_allowed = false;
        self.target = T::default();
    }
}

impl<S: States, T: 'static> Container<S, T> {
    /// Grammar driving this container
    pub fn grammar(&self) -> &'static Grammar<S, T> {
        self.grammar
    }

    /// Current grammar state
    pub fn state(&self) -> S {
        self.state
    }

    /// Move to `state`
    pub fn set_transition(&mut self, state: S) {
        self.state = state;
    }

    /// TLV currently being processed
    pub fn current_tlv(&self) -> &Tlv {
        &self.tlv
    }

    /// Current offset (next byte to read)
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of constructed values currently open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open the constructed value matched by `transition`, ending at
    /// `end_offset`
    ///
    /// The transition's closing states say where the value may close; without
    /// them it is an explicit tag holding a single TLV. The first value
    /// opened is the PDU itself and ignores them.
    ///
    /// # Error Handling
    /// Fails if the value would end after the value enclosing it.
    pub fn push_length(&mut self, end_offset: usize, transition: &Transition<S, T>) -> CodecResult<()> {
        if let Some(parent_end) = self.current_end() {
            if end_offset > parent_end {
                return Err(CodecError::truncated(
                    self.tlv.offset,
                    format!(
                        "TLV 0x{:02X} ends at {} beyond its enclosing value ending at {}",
                        self.tlv.tag, end_offset, parent_end
                    ),
                ));
            }
        }
        let closing = match transition.closes_in() {
            _ if self.stack.is_empty() => FrameEnd::Pdu,
            None => FrameEnd::Single,
            Some(states) => FrameEnd::States(states),
        };
        self.stack.push(Frame {
            end: end_offset,
            closing,
            opened: transition.next(),
            values: 0,
        });
        Ok(())
    }

    /// Count the TLV just started, selected by `transition`, against the
    /// innermost open value
    ///
    /// # Error Handling
    /// Fails on a second TLV inside an explicit tag, and on a TLV that starts
    /// a new element of a list inside the element still open.
    pub(crate) fn value_started(&mut self, transition: &Transition<S, T>) -> CodecResult<()> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        let misplaced = match frame.closing {
            FrameEnd::Pdu => false,
            FrameEnd::Single => frame.values > 0,
            FrameEnd::States(_) => transition.next() == frame.opened,
        };
        if misplaced {
            return Err(CodecError::truncated(
                self.tlv.offset,
                format!(
                    "TLV 0x{:02X} in state {} does not belong inside the value ending at {}",
                    self.tlv.tag,
                    self.state.name(),
                    frame.end
                ),
            ));
        }
        frame.values += 1;
        Ok(())
    }

    /// Close the innermost constructed value and return its end offset
    ///
    /// # Error Handling
    /// Fails if no constructed value is open, or if the grammar has not
    /// finished the value: an explicit tag that held no TLV, or a SEQUENCE
    /// closing outside its closing states.
    pub fn pop_length(&mut self) -> CodecResult<usize> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| CodecError::truncated(self.offset, "length stack underflow"))?;

        let finished = match frame.closing {
            FrameEnd::Pdu => true,
            FrameEnd::Single => frame.values == 1,
            FrameEnd::States(states) => states.contains(&self.state),
        };
        if !finished {
            return Err(CodecError::truncated(
                self.offset,
                format!(
                    "{}: constructed value ending at {} closed in state {}",
                    self.grammar.name(),
                    frame.end,
                    self.state.name()
                ),
            ));
        }
        Ok(frame.end)
    }

    /// End offset of the innermost open constructed value
    pub fn current_end(&self) -> Option<usize> {
        self.stack.last().map(|frame| frame.end)
    }

    /// Whether the PDU may end in the current state
    pub fn is_grammar_end_allowed(&self) -> bool {
        self.grammar_end_allowed
    }

    /// Allow (or forbid) the PDU to end in the current state
    ///
    /// Actions set this after the last mandatory field so trailing optional
    /// fields may be absent, and clear it when a new element starts.
    pub fn set_grammar_end_allowed(&mut self, allowed: bool) {
        self.grammar_end_allowed = allowed;
    }

    /// Whether the terminal state has been reached
    pub fn is_complete(&self) -> bool {
        self.state.is_end_state() && self.stack.is_empty()
    }

    /// Object under construction
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable object under construction
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Give up the container and keep the decoded object
    ///
    /// # Error Handling
    /// Fails if the terminal state has not been reached, so a half-built
    /// object never leaves the container.
    pub fn into_target(self) -> CodecResult<T> {
        if !self.is_complete() {
            return Err(CodecError::truncated(
                self.offset,
                format!(
                    "{} decoding stopped in state {}",
                    self.grammar.name(),
                    self.state.name()
                ),
            ));
        }
        Ok(self.target)
    }
}

impl<S: States, T: std::fmt::Debug + 'static> std::fmt::Debug for Container<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("grammar", &self.grammar.name())
            .field("state", &self.state.name())
            .field("phase", &self.phase)
            .field("tlv", &self.tlv)
            .field("stack", &self.stack)
            .field("offset", &self.offset)
            .field("grammar_end_allowed", &self.grammar_end_allowed)
            .field("target", &self.target)
            .finish()
    }
}
