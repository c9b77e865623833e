//! The decoder loop
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use ads_asn1::grammar::{Asn1Decoder, Container, DecodeStatus};
//! use bytes::BytesMut;
//!
//! let decoder = Asn1Decoder::new();
//! let mut container = Container::new(&MY_GRAMMAR);
//! let mut buffer = BytesMut::new();
//!
//! loop {
//!     buffer.extend_from_slice(&socket_read()?);
//!     if decoder.decode(&mut buffer, &mut container)? == DecodeStatus::Done {
//!         break;
//!     }
//! }
//! let pdu = container.into_target()?;
//! ```

use crate::ber::length::long_form_octets;
use crate::grammar::container::TlvPhase;
use crate::grammar::{Container, DecoderConfig, Grammar, States, Transition, ValueMode};
use ads_core::{CodecError, CodecResult};
use bytes::Buf;

/// Upper bound on the value buffer reserved up front from a declared length
const MAX_PREALLOCATION: usize = 64 * 1024;

/// Outcome of one [`Asn1Decoder::decode`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The input ran out before the PDU was complete; feed more bytes and
    /// call again with the same container.
    NeedMoreData,
    /// The terminal state was reached; the object can be taken with
    /// [`Container::into_target`].
    Done,
}

/// Drives a [`Container`] through its [`Grammar`], one TLV at a time
#[derive(Debug, Clone, Default)]
pub struct Asn1Decoder {
    config: DecoderConfig,
}

impl Asn1Decoder {
    /// Decoder with the default limits
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Decoder with explicit limits
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Limits in use
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Consume as much of `buf` as the current PDU needs
    ///
    /// Bytes past the end of the PDU are left in `buf`. On error the
    /// container is unusable until [`Container::reset`].
    pub fn decode<S, T, B>(&self, buf: &mut B, container: &mut Container<S, T>) -> CodecResult<DecodeStatus>
    where
        S: States,
        T: 'static,
        B: Buf,
    {
        let result = self.run(buf, container);
        if let Err(err) = &result {
            log::debug!(
                "{}: decoding failed in state {}: {}",
                container.grammar().name(),
                container.state().name(),
                err
            );
        }
        result
    }

    /// Decode one complete PDU held in `bytes`
    ///
    /// # Error Handling
    /// Besides decoding errors, fails if the bytes end before the terminal
    /// state or if bytes remain after it.
    pub fn decode_pdu<S, T>(&self, bytes: &[u8], grammar: &'static Grammar<S, T>) -> CodecResult<T>
    where
        S: States,
        T: Default + 'static,
    {
        self.decode_pdu_at(bytes, grammar, 0)
    }

    /// Like [`decode_pdu`](Self::decode_pdu) for a PDU found at
    /// `base_offset` inside a larger buffer
    pub fn decode_pdu_at<S, T>(
        &self,
        bytes: &[u8],
        grammar: &'static Grammar<S, T>,
        base_offset: usize,
    ) -> CodecResult<T>
    where
        S: States,
        T: Default + 'static,
    {
        let mut container = Container::with_base_offset(grammar, base_offset);
        let mut input = bytes;

        match self.decode(&mut input, &mut container)? {
            DecodeStatus::Done if input.has_remaining() => Err(CodecError::truncated(
                container.offset(),
                format!(
                    "{} trailing bytes after {} PDU",
                    input.remaining(),
                    grammar.name()
                ),
            )),
            DecodeStatus::Done => container.into_target(),
            DecodeStatus::NeedMoreData => Err(CodecError::truncated(
                container.offset(),
                format!(
                    "input ended in state {} of grammar {}",
                    container.state().name(),
                    grammar.name()
                ),
            )),
        }
    }

    fn run<S, T, B>(&self, buf: &mut B, container: &mut Container<S, T>) -> CodecResult<DecodeStatus>
    where
        S: States,
        T: 'static,
        B: Buf,
    {
        if container.is_complete() {
            return Ok(DecodeStatus::Done);
        }

        loop {
            match container.phase {
                TlvPhase::Tag => {
                    if !buf.has_remaining() {
                        return Ok(DecodeStatus::NeedMoreData);
                    }
                    let offset = container.offset;
                    let tag = buf.get_u8();
                    container.offset += 1;

                    let grammar = container.grammar();
                    let transition = grammar.transition(container.state(), tag).ok_or_else(|| {
                        CodecError::UnexpectedTag {
                            grammar: grammar.name(),
                            state: container.state().name(),
                            tag,
                            offset,
                        }
                    })?;
                    container.pending = Some(*transition);
                    container.tlv.start(tag, offset);
                    container.value_started(transition)?;
                    container.phase = TlvPhase::LengthStart;
                }
                TlvPhase::LengthStart => {
                    if !buf.has_remaining() {
                        return Ok(DecodeStatus::NeedMoreData);
                    }
                    let offset = container.offset;
                    let first_byte = buf.get_u8();
                    container.offset += 1;

                    if first_byte & 0x80 == 0 {
                        container.tlv.length = first_byte as usize;
                        if self.length_decoded(container)? {
                            return Ok(DecodeStatus::Done);
                        }
                    } else {
                        let remaining = long_form_octets(first_byte, offset)?;
                        container.phase = TlvPhase::LengthPending { remaining };
                    }
                }
                TlvPhase::LengthPending { mut remaining } => {
                    while remaining > 0 && buf.has_remaining() {
                        container.tlv.length = (container.tlv.length << 8) | buf.get_u8() as usize;
                        container.offset += 1;
                        remaining -= 1;
                    }
                    if remaining > 0 {
                        container.phase = TlvPhase::LengthPending { remaining };
                        return Ok(DecodeStatus::NeedMoreData);
                    }
                    if self.length_decoded(container)? {
                        return Ok(DecodeStatus::Done);
                    }
                }
                TlvPhase::Value => {
                    let missing = container.tlv.length - container.tlv.value.len();
                    let mut take = missing.min(buf.remaining());
                    container.offset += take;
                    while take > 0 {
                        let chunk = buf.chunk();
                        let n = chunk.len().min(take);
                        container.tlv.value.extend_from_slice(&chunk[..n]);
                        buf.advance(n);
                        take -= n;
                    }
                    if container.tlv.value.len() < container.tlv.length {
                        return Ok(DecodeStatus::NeedMoreData);
                    }

                    let transition = self.pending(container)?;
                    self.execute(container, &transition)?;
                    if self.tlv_complete(container)? {
                        return Ok(DecodeStatus::Done);
                    }
                }
            }
        }
    }

    /// The length of the current TLV is known; returns whether the PDU is
    /// complete
    fn length_decoded<S: States, T: 'static>(&self, container: &mut Container<S, T>) -> CodecResult<bool> {
        let length = container.tlv.length;
        let end = container.offset + length;

        if container.depth() == 0 {
            let pdu_size = end - container.tlv.offset;
            if pdu_size > self.config.max_pdu_size() {
                return Err(CodecError::PduTooLarge {
                    length: pdu_size,
                    max: self.config.max_pdu_size(),
                });
            }
        }

        let transition = self.pending(container)?;
        match transition.mode() {
            ValueMode::Descend => {
                if container.depth() >= self.config.max_depth() {
                    return Err(CodecError::truncated(
                        container.tlv.offset,
                        format!("nesting deeper than {} levels", self.config.max_depth()),
                    ));
                }
                container.push_length(end, &transition)?;
                self.execute(container, &transition)?;
                self.tlv_complete(container)
            }
            ValueMode::Value => {
                if let Some(parent_end) = container.current_end() {
                    if end > parent_end {
                        return Err(CodecError::truncated(
                            container.tlv.offset,
                            format!(
                                "TLV 0x{:02X} ends at {} beyond its enclosing value ending at {}",
                                container.tlv.tag, end, parent_end
                            ),
                        ));
                    }
                }
                container.tlv.value.reserve(length.min(MAX_PREALLOCATION));
                container.phase = TlvPhase::Value;
                Ok(false)
            }
        }
    }

    fn pending<S: States, T: 'static>(&self, container: &Container<S, T>) -> CodecResult<Transition<S, T>> {
        container.pending.ok_or_else(|| {
            CodecError::truncated(container.tlv.offset, "no transition selected for TLV")
        })
    }

    /// Run the action of `transition` and move to its next state
    fn execute<S: States, T: 'static>(
        &self,
        container: &mut Container<S, T>,
        transition: &Transition<S, T>,
    ) -> CodecResult<()> {
        log::trace!(
            "{}: {} -[0x{:02X}]-> {}",
            container.grammar().name(),
            transition.current().name(),
            transition.tag(),
            transition.next().name()
        );

        if let Some(action) = transition.action() {
            action.run(container)?;
        }
        container.set_transition(transition.next());
        container.phase = TlvPhase::Tag;
        Ok(())
    }

    /// Close every constructed value that ends here; returns whether the
    /// PDU is complete
    fn tlv_complete<S: States, T: 'static>(&self, container: &mut Container<S, T>) -> CodecResult<bool> {
        while container.current_end() == Some(container.offset) {
            container.pop_length()?;
        }

        if container.depth() > 0 {
            return Ok(false);
        }

        if container.state().is_end_state() || container.is_grammar_end_allowed() {
            container.set_transition(S::END);
            log::debug!(
                "{}: PDU decoded, ends at offset {}",
                container.grammar().name(),
                container.offset
            );
            return Ok(true);
        }

        Err(CodecError::truncated(
            container.offset,
            format!(
                "PDU ended in state {} of grammar {}",
                container.state().name(),
                container.grammar().name()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::{context_tag, GENERAL_STRING_TAG, INTEGER_TAG, SEQUENCE_TAG};
    use crate::ber::value::{decode_general_string, decode_i32};
    use crate::grammar::actions::check_not_null_length;
    use bytes::BytesMut;
    use once_cell::sync::Lazy;

    // Entry ::= SEQUENCE { id [0] INTEGER, label [1] GeneralString OPTIONAL }
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Entry {
        id: i32,
        label: Option<String>,
    }

    crate::states! {
        enum EntryStates {
            Start,
            Sequence,
            IdTag,
            Id,
            LabelTag,
            Label,
            Last,
        }
        start = Start;
        end = Last;
    }

    fn init_entry(container: &mut Container<EntryStates, Entry>) -> CodecResult<()> {
        check_not_null_length(container)?;
        *container.target_mut() = Entry::default();
        Ok(())
    }

    fn store_id(container: &mut Container<EntryStates, Entry>) -> CodecResult<()> {
        let id = decode_i32(container.current_tlv().value())?;
        container.target_mut().id = id;
        container.set_grammar_end_allowed(true);
        Ok(())
    }

    fn store_label(container: &mut Container<EntryStates, Entry>) -> CodecResult<()> {
        let label = decode_general_string("label", container.current_tlv().value())?;
        container.target_mut().label = Some(label);
        Ok(())
    }

    static ENTRY_GRAMMAR: Lazy<Grammar<EntryStates, Entry>> = Lazy::new(|| {
        use EntryStates::*;
        let mut grammar = Grammar::new("Entry");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init Entry", init_entry))
            .add(Transition::new(Sequence, IdTag, context_tag(0), ValueMode::Descend)
                .with_action("check id", check_not_null_length))
            .add(Transition::new(IdTag, Id, INTEGER_TAG, ValueMode::Value)
                .with_action("store id", store_id))
            .add(Transition::new(Id, LabelTag, context_tag(1), ValueMode::Descend)
                .with_action("check label", check_not_null_length))
            .add(Transition::new(LabelTag, Label, GENERAL_STRING_TAG, ValueMode::Value)
                .with_action("store label", store_label));
        grammar
    });

    const WITH_LABEL: [u8; 14] = [
        0x30, 0x0C, // SEQUENCE
        0xA0, 0x03, 0x02, 0x01, 0x2A, // [0] INTEGER 42
        0xA1, 0x05, 0x1B, 0x03, b'a', b'b', b'c', // [1] GeneralString "abc"
    ];

    #[test]
    fn test_decode_full_pdu() {
        let entry = Asn1Decoder::new().decode_pdu(&WITH_LABEL, &ENTRY_GRAMMAR).unwrap();
        assert_eq!(
            entry,
            Entry {
                id: 42,
                label: Some("abc".to_string())
            }
        );
    }

    #[test]
    fn test_optional_field_absent() {
        let bytes = [0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x2A];
        let entry = Asn1Decoder::new().decode_pdu(&bytes, &ENTRY_GRAMMAR).unwrap();
        assert_eq!(entry, Entry { id: 42, label: None });
    }

    #[test]
    fn test_byte_by_byte_feeding() {
        let decoder = Asn1Decoder::new();
        let mut container = Container::new(&ENTRY_GRAMMAR);
        let mut buffer = BytesMut::new();

        for (index, byte) in WITH_LABEL.iter().enumerate() {
            buffer.extend_from_slice(&[*byte]);
            let status = decoder.decode(&mut buffer, &mut container).unwrap();
            if index + 1 < WITH_LABEL.len() {
                assert_eq!(status, DecodeStatus::NeedMoreData, "byte {}", index);
            } else {
                assert_eq!(status, DecodeStatus::Done);
            }
            assert!(buffer.is_empty());
        }

        assert_eq!(container.state(), EntryStates::Last);
        assert_eq!(container.into_target().unwrap().label.as_deref(), Some("abc"));
    }

    #[test]
    fn test_leaves_following_pdu_in_buffer() {
        let decoder = Asn1Decoder::new();
        let mut container = Container::new(&ENTRY_GRAMMAR);
        let mut buffer = BytesMut::from(&WITH_LABEL[..]);
        buffer.extend_from_slice(&[0x30, 0x00]);

        assert_eq!(decoder.decode(&mut buffer, &mut container).unwrap(), DecodeStatus::Done);
        assert_eq!(&buffer[..], &[0x30, 0x00]);
        // A completed container stays done
        assert_eq!(decoder.decode(&mut buffer, &mut container).unwrap(), DecodeStatus::Done);
    }

    #[test]
    fn test_unexpected_tag() {
        let bytes = [0x30, 0x05, 0xA1, 0x03, 0x02, 0x01, 0x2A];
        let err = Asn1Decoder::new().decode_pdu(&bytes, &ENTRY_GRAMMAR).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnexpectedTag {
                grammar: "Entry",
                state: "Sequence",
                tag: 0xA1,
                offset: 2,
            }
        );
    }

    #[test]
    fn test_indefinite_length_rejected() {
        let err = Asn1Decoder::new().decode_pdu(&[0x30, 0x80], &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(err, CodecError::MalformedLength { offset: 1, .. }));
    }

    #[test]
    fn test_missing_mandatory_field() {
        let err = Asn1Decoder::new().decode_pdu(&[0x30, 0x00], &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(err, CodecError::InvalidFieldValue { .. }));

        let err = Asn1Decoder::new()
            .decode_pdu(&[0x30, 0x02, 0xA0, 0x00], &ENTRY_GRAMMAR)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_nested_length_exceeds_parent() {
        let bytes = [0x30, 0x05, 0xA0, 0x04, 0x02, 0x01, 0x2A];
        let err = Asn1Decoder::new().decode_pdu(&bytes, &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedOrMalformedStructure { offset: 2, .. }
        ));
    }

    #[test]
    fn test_truncated_input() {
        let err = Asn1Decoder::new()
            .decode_pdu(&WITH_LABEL[..9], &ENTRY_GRAMMAR)
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedOrMalformedStructure { .. }));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = WITH_LABEL.to_vec();
        bytes.push(0x00);
        let err = Asn1Decoder::new().decode_pdu(&bytes, &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedOrMalformedStructure { offset: 14, .. }
        ));
    }

    #[test]
    fn test_pdu_size_limit() {
        let decoder = Asn1Decoder::with_config(DecoderConfig::new().with_max_pdu_size(8));
        let err = decoder.decode_pdu(&WITH_LABEL, &ENTRY_GRAMMAR).unwrap_err();
        assert_eq!(err, CodecError::PduTooLarge { length: 14, max: 8 });
    }

    #[test]
    fn test_depth_limit() {
        let decoder = Asn1Decoder::with_config(DecoderConfig::new().with_max_depth(1));
        let err = decoder.decode_pdu(&WITH_LABEL, &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedOrMalformedStructure { offset: 2, .. }));
    }

    #[test]
    fn test_reset_allows_reuse() {
        let decoder = Asn1Decoder::new();
        let mut container = Container::new(&ENTRY_GRAMMAR);
        let mut bad: &[u8] = &[0x31];
        assert!(decoder.decode(&mut bad, &mut container).is_err());

        container.reset();
        let mut good: &[u8] = &WITH_LABEL;
        assert_eq!(decoder.decode(&mut good, &mut container).unwrap(), DecodeStatus::Done);
        assert_eq!(container.into_target().unwrap().id, 42);
    }

    #[test]
    fn test_incomplete_container_keeps_target() {
        let decoder = Asn1Decoder::new();
        let mut container = Container::new(&ENTRY_GRAMMAR);
        let mut partial: &[u8] = &WITH_LABEL[..7];
        assert_eq!(
            decoder.decode(&mut partial, &mut container).unwrap(),
            DecodeStatus::NeedMoreData
        );
        assert_eq!(container.state(), EntryStates::Id);
        assert!(container.into_target().is_err());
    }

    #[test]
    fn test_second_value_inside_explicit_tag_rejected() {
        // label placed inside the [0] tag of id
        let bytes = [
            0x30, 0x0A, 0xA0, 0x08, 0x02, 0x01, 0x2A, 0xA1, 0x03, 0x1B, 0x01, b'a',
        ];
        let err = Asn1Decoder::new().decode_pdu(&bytes, &ENTRY_GRAMMAR).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedOrMalformedStructure { offset: 7, .. }
        ));
    }

    // List ::= SEQUENCE OF SEQUENCE { id [0] INTEGER, label [1] GeneralString }
    crate::states! {
        enum ListStates {
            Start,
            Sequence,
            Item,
            IdTag,
            Id,
            LabelTag,
            Label,
            Last,
        }
        start = Start;
        end = Last;
    }

    fn init_list(container: &mut Container<ListStates, Vec<Entry>>) -> CodecResult<()> {
        check_not_null_length(container)?;
        container.target_mut().clear();
        Ok(())
    }

    fn start_item(container: &mut Container<ListStates, Vec<Entry>>) -> CodecResult<()> {
        check_not_null_length(container)?;
        container.target_mut().push(Entry::default());
        container.set_grammar_end_allowed(false);
        Ok(())
    }

    fn store_item_id(container: &mut Container<ListStates, Vec<Entry>>) -> CodecResult<()> {
        let id = decode_i32(container.current_tlv().value())?;
        if let Some(item) = container.target_mut().last_mut() {
            item.id = id;
        }
        Ok(())
    }

    fn store_item_label(container: &mut Container<ListStates, Vec<Entry>>) -> CodecResult<()> {
        let label = decode_general_string("label", container.current_tlv().value())?;
        if let Some(item) = container.target_mut().last_mut() {
            item.label = Some(label);
        }
        container.set_grammar_end_allowed(true);
        Ok(())
    }

    static LIST_GRAMMAR: Lazy<Grammar<ListStates, Vec<Entry>>> = Lazy::new(|| {
        use ListStates::*;
        let mut grammar = Grammar::new("List");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init List", init_list))
            .add(Transition::new(Sequence, Item, SEQUENCE_TAG, ValueMode::Descend)
                .closing_in(&[Label])
                .with_action("start item", start_item))
            .add(Transition::new(Item, IdTag, context_tag(0), ValueMode::Descend)
                .with_action("check id", check_not_null_length))
            .add(Transition::new(IdTag, Id, INTEGER_TAG, ValueMode::Value)
                .with_action("store id", store_item_id))
            .add(Transition::new(Id, LabelTag, context_tag(1), ValueMode::Descend)
                .with_action("check label", check_not_null_length))
            .add(Transition::new(LabelTag, Label, GENERAL_STRING_TAG, ValueMode::Value)
                .with_action("store label", store_item_label))
            .add(Transition::new(Label, Item, SEQUENCE_TAG, ValueMode::Descend)
                .closing_in(&[Label])
                .with_action("start item", start_item));
        grammar
    });

    const ITEM_7: [u8; 12] = [
        0x30, 0x0A, 0xA0, 0x03, 0x02, 0x01, 0x07, 0xA1, 0x03, 0x1B, 0x01, b'x',
    ];

    #[test]
    fn test_decode_list() {
        let mut bytes = vec![0x30, 0x18];
        bytes.extend_from_slice(&ITEM_7);
        bytes.extend_from_slice(&ITEM_7);
        let list = Asn1Decoder::new().decode_pdu(&bytes, &LIST_GRAMMAR).unwrap();
        let item = Entry {
            id: 7,
            label: Some("x".to_string()),
        };
        assert_eq!(list, vec![item.clone(), item]);
    }

    #[test]
    fn test_sequence_closing_early_rejected() {
        // The item ends after its id; the label follows it
        let bytes = [
            0x30, 0x0C, 0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x07, 0xA1, 0x03, 0x1B, 0x01, b'x',
        ];
        let err = Asn1Decoder::new().decode_pdu(&bytes, &LIST_GRAMMAR).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedOrMalformedStructure { offset: 9, .. }
        ));
    }

    #[test]
    fn test_item_nested_in_item_rejected() {
        // Second item placed inside the first one
        let mut bytes = vec![0x30, 0x18, 0x30, 0x16];
        bytes.extend_from_slice(&ITEM_7[2..]);
        bytes.extend_from_slice(&ITEM_7);
        let err = Asn1Decoder::new().decode_pdu(&bytes, &LIST_GRAMMAR).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedOrMalformedStructure { offset: 14, .. }
        ));
    }
}
