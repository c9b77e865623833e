//! Actions shared by every grammar

use crate::grammar::{Asn1Decoder, Container, Grammar, States};
use ads_core::{CodecError, CodecResult};

/// Reject a TLV whose value is empty
///
/// Used on constructed tags that must carry content; the content itself is
/// decoded by the following transitions.
pub fn check_not_null_length<S: States, T: 'static>(container: &mut Container<S, T>) -> CodecResult<()> {
    let tlv = container.current_tlv();
    if tlv.length() == 0 {
        return Err(CodecError::invalid_field(
            container.grammar().name(),
            format!(
                "empty value for tag 0x{:02X} in state {} at offset {}",
                tlv.tag(),
                container.state().name(),
                tlv.offset()
            ),
        ));
    }
    Ok(())
}

/// Decode the buffered value of the current TLV with another grammar
///
/// Errors report offsets in the outer PDU.
pub fn decode_nested<S, T, NS, NT>(
    container: &Container<S, T>,
    grammar: &'static Grammar<NS, NT>,
) -> CodecResult<NT>
where
    S: States,
    T: 'static,
    NS: States,
    NT: Default + 'static,
{
    let tlv = container.current_tlv();
    let value_offset = container.offset() - tlv.value().len();
    Asn1Decoder::new().decode_pdu_at(tlv.value(), grammar, value_offset)
}
