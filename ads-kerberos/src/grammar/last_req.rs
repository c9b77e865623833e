//! LastReq grammar
//!
//! The list loops on the inner SEQUENCE tag: after an `lr-value` the next
//! entry may start, or the outer SEQUENCE OF may end.

use crate::types::{LastReq, LastReqEntry};
use ads_asn1::ber::types::{context_tag, GENERALIZED_TIME_TAG, INTEGER_TAG, SEQUENCE_TAG};
use ads_asn1::ber::value::{decode_generalized_time, decode_i32};
use ads_asn1::grammar::actions::check_not_null_length;
use ads_asn1::{Container, Grammar, Transition, ValueMode};
use ads_core::{CodecError, CodecResult};
use once_cell::sync::Lazy;

ads_asn1::states! {
    /// States of the LastReq grammar
    pub enum LastReqStates {
        Start,
        Sequence,
        Entry,
        LrTypeTag,
        LrType,
        LrValueTag,
        LrValue,
        Last,
    }
    start = Start;
    end = Last;
}

pub type LastReqContainer = Container<LastReqStates, LastReq>;

fn current_entry(container: &mut LastReqContainer) -> CodecResult<&mut LastReqEntry> {
    container
        .target_mut()
        .0
        .last_mut()
        .ok_or_else(|| CodecError::invalid_field("last-req", "no entry started"))
}

fn init_last_req(container: &mut LastReqContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = LastReq::default();
    Ok(())
}

fn start_entry(container: &mut LastReqContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    container.target_mut().0.push(LastReqEntry::default());
    container.set_grammar_end_allowed(false);
    Ok(())
}

fn store_lr_type(container: &mut LastReqContainer) -> CodecResult<()> {
    let lr_type = decode_i32(container.current_tlv().value())?;
    current_entry(container)?.lr_type = lr_type;
    Ok(())
}

fn store_lr_value(container: &mut LastReqContainer) -> CodecResult<()> {
    let lr_value = decode_generalized_time(container.current_tlv().value())?;
    current_entry(container)?.lr_value = lr_value;
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static LAST_REQ_GRAMMAR: Lazy<Grammar<LastReqStates, LastReq>> = Lazy::new(|| {
    use LastReqStates::*;
    let mut grammar = Grammar::new("LastReq");
    grammar
        .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
            .with_action("init LastReq", init_last_req))
        .add(Transition::new(Sequence, Entry, SEQUENCE_TAG, ValueMode::Descend)
            .closing_in(&[LrValue])
            .with_action("start entry", start_entry))
        .add(Transition::new(Entry, LrTypeTag, context_tag(0), ValueMode::Descend)
            .with_action("check lr-type", check_not_null_length))
        .add(Transition::new(LrTypeTag, LrType, INTEGER_TAG, ValueMode::Value)
            .with_action("store lr-type", store_lr_type))
        .add(Transition::new(LrType, LrValueTag, context_tag(1), ValueMode::Descend)
            .with_action("check lr-value", check_not_null_length))
        .add(Transition::new(LrValueTag, LrValue, GENERALIZED_TIME_TAG, ValueMode::Value)
            .with_action("store lr-value", store_lr_value))
        .add(Transition::new(LrValue, Entry, SEQUENCE_TAG, ValueMode::Descend)
            .closing_in(&[LrValue])
            .with_action("start entry", start_entry));
    grammar
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KerberosTime, LastReqType};
    use ads_asn1::Asn1Decoder;

    fn entry(lr_type: i32, time: &str) -> LastReqEntry {
        LastReqEntry::new(lr_type, KerberosTime::parse(time).unwrap())
    }

    #[test]
    fn test_decode_several_entries() {
        let last_req = LastReq::new(vec![
            entry(0, "20240101000000Z"),
            entry(-6, "20250630235959Z"),
            entry(300, "19991231120000Z"),
        ]);
        let bytes = last_req.encode().unwrap();

        let decoded = Asn1Decoder::new().decode_pdu(&bytes, &LAST_REQ_GRAMMAR).unwrap();
        assert_eq!(decoded, last_req);
        assert_eq!(decoded.entries()[1].kind(), LastReqType::PasswordExpiration);
        assert!(decoded.entries()[1].is_local());
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            LastReq::decode(&[0x30, 0x00]),
            Err(CodecError::InvalidFieldValue { field: "LastReq", .. })
        ));
    }

    #[test]
    fn test_entry_without_value_rejected() {
        let bytes = [0x30, 0x07, 0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x00];
        assert!(matches!(
            LastReq::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { offset: 9, .. })
        ));
    }

    #[test]
    fn test_truncated_second_entry_rejected() {
        let mut bytes = LastReq::new(vec![entry(0, "20240101000000Z")])
            .encode()
            .unwrap();
        // A second entry holding only its lr-type
        bytes.extend_from_slice(&[0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x01]);
        bytes[1] += 7;
        assert!(matches!(
            LastReq::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { .. })
        ));
    }

    #[test]
    fn test_bad_time_rejected() {
        let mut bytes = vec![0x30, 0x1A, 0x30, 0x18, 0xA0, 0x03, 0x02, 0x01, 0x00, 0xA1, 0x11, 0x18, 0x0F];
        bytes.extend_from_slice(b"20241301000000Z");
        assert!(matches!(
            LastReq::decode(&bytes),
            Err(CodecError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_value_outside_entry_rejected() {
        // The entry SEQUENCE holds only lr-type; lr-value follows it
        let mut bytes = vec![0x30, 0x1A, 0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x00, 0xA1, 0x11, 0x18, 0x0F];
        bytes.extend_from_slice(b"20240101000000Z");
        assert!(matches!(
            LastReq::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { offset: 9, .. })
        ));
    }
}
