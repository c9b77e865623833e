//! PrincipalName grammar

use crate::types::{PrincipalName, PrincipalNameType};
use ads_asn1::ber::types::{context_tag, GENERAL_STRING_TAG, INTEGER_TAG, SEQUENCE_TAG};
use ads_asn1::ber::value::{decode_general_string, decode_i32};
use ads_asn1::grammar::actions::check_not_null_length;
use ads_asn1::{Container, Grammar, Transition, ValueMode};
use ads_core::CodecResult;
use once_cell::sync::Lazy;

ads_asn1::states! {
    /// States of the PrincipalName grammar
    pub enum PrincipalNameStates {
        Start,
        Sequence,
        NameTypeTag,
        NameType,
        NameStringTag,
        NameStrings,
        NameString,
        Last,
    }
    start = Start;
    end = Last;
}

pub type PrincipalNameContainer = Container<PrincipalNameStates, PrincipalName>;

fn init_principal_name(container: &mut PrincipalNameContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = PrincipalName::default();
    Ok(())
}

fn store_name_type(container: &mut PrincipalNameContainer) -> CodecResult<()> {
    let name_type = decode_i32(container.current_tlv().value())?;
    container.target_mut().name_type = PrincipalNameType::from(name_type);
    Ok(())
}

fn add_name_string(container: &mut PrincipalNameContainer) -> CodecResult<()> {
    let component = decode_general_string("name-string", container.current_tlv().value())?;
    container.target_mut().name_string.push(component);
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static PRINCIPAL_NAME_GRAMMAR: Lazy<Grammar<PrincipalNameStates, PrincipalName>> =
    Lazy::new(|| {
        use PrincipalNameStates::*;
        let mut grammar = Grammar::new("PrincipalName");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init PrincipalName", init_principal_name))
            .add(Transition::new(Sequence, NameTypeTag, context_tag(0), ValueMode::Descend)
                .with_action("check name-type", check_not_null_length))
            .add(Transition::new(NameTypeTag, NameType, INTEGER_TAG, ValueMode::Value)
                .with_action("store name-type", store_name_type))
            .add(Transition::new(NameType, NameStringTag, context_tag(1), ValueMode::Descend)
                .with_action("check name-string", check_not_null_length))
            // At least one component
            .add(Transition::new(NameStringTag, NameStrings, SEQUENCE_TAG, ValueMode::Descend)
                .closing_in(&[NameString])
                .with_action("check name-string list", check_not_null_length))
            .add(Transition::new(NameStrings, NameString, GENERAL_STRING_TAG, ValueMode::Value)
                .with_action("add name-string", add_name_string))
            .add(Transition::new(NameString, NameString, GENERAL_STRING_TAG, ValueMode::Value)
                .with_action("add name-string", add_name_string));
        grammar
    });

#[cfg(test)]
mod tests {
    use super::*;
    use ads_asn1::Asn1Decoder;
    use ads_core::CodecError;

    #[test]
    fn test_decode_service_name() {
        let name = PrincipalName::new(
            PrincipalNameType::SrvInst,
            vec!["krbtgt".to_string(), "EXAMPLE.COM".to_string()],
        );
        let bytes = name.encode().unwrap();
        let decoded = Asn1Decoder::new()
            .decode_pdu(&bytes, &PRINCIPAL_NAME_GRAMMAR)
            .unwrap();
        assert_eq!(decoded, name);
        assert_eq!(decoded.to_string(), "krbtgt/EXAMPLE.COM");
    }

    #[test]
    fn test_no_component_rejected() {
        let bytes = [
            0x30, 0x09, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x02, 0x30, 0x00,
        ];
        assert!(matches!(
            PrincipalName::decode(&bytes),
            Err(CodecError::InvalidFieldValue { field: "PrincipalName", .. })
        ));
    }

    #[test]
    fn test_wrong_component_tag() {
        // OCTET STRING where a KerberosString belongs
        let bytes = [
            0x30, 0x0C, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x05, 0x30, 0x03, 0x04, 0x01, b'a',
        ];
        assert_eq!(
            PrincipalName::decode(&bytes),
            Err(CodecError::UnexpectedTag {
                grammar: "PrincipalName",
                state: "NameStrings",
                tag: 0x04,
                offset: 11,
            })
        );
    }

    #[test]
    fn test_component_outside_sequence_of_rejected() {
        let bytes = [
            0x30, 0x0F, 0xA0, 0x03, 0x02, 0x01, 0x01, 0xA1, 0x08, 0x30, 0x03, 0x1B, 0x01, b'a',
            0x1B, 0x01, b'b',
        ];
        assert!(matches!(
            PrincipalName::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { offset: 14, .. })
        ));
    }
}
