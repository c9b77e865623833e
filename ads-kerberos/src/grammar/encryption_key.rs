//! EncryptionKey grammar

use crate::types::{EncryptionKey, EncryptionType};
use ads_asn1::ber::types::{context_tag, INTEGER_TAG, OCTET_STRING_TAG, SEQUENCE_TAG};
use ads_asn1::ber::value::decode_i32;
use ads_asn1::grammar::actions::check_not_null_length;
use ads_asn1::{Container, Grammar, Transition, ValueMode};
use ads_core::CodecResult;
use once_cell::sync::Lazy;

ads_asn1::states! {
    /// States of the EncryptionKey grammar
    pub enum EncryptionKeyStates {
        Start,
        Sequence,
        KeyTypeTag,
        KeyType,
        KeyValueTag,
        KeyValue,
        Last,
    }
    start = Start;
    end = Last;
}

pub type EncryptionKeyContainer = Container<EncryptionKeyStates, EncryptionKey>;

fn init_encryption_key(container: &mut EncryptionKeyContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = EncryptionKey::default();
    Ok(())
}

fn store_key_type(container: &mut EncryptionKeyContainer) -> CodecResult<()> {
    let key_type = decode_i32(container.current_tlv().value())?;
    container.target_mut().key_type = EncryptionType::from(key_type);
    Ok(())
}

fn store_key_value(container: &mut EncryptionKeyContainer) -> CodecResult<()> {
    let key_value = container.current_tlv().value().to_vec();
    container.target_mut().key_value = key_value;
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static ENCRYPTION_KEY_GRAMMAR: Lazy<Grammar<EncryptionKeyStates, EncryptionKey>> =
    Lazy::new(|| {
        use EncryptionKeyStates::*;
        let mut grammar = Grammar::new("EncryptionKey");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init EncryptionKey", init_encryption_key))
            .add(Transition::new(Sequence, KeyTypeTag, context_tag(0), ValueMode::Descend)
                .with_action("check keytype", check_not_null_length))
            .add(Transition::new(KeyTypeTag, KeyType, INTEGER_TAG, ValueMode::Value)
                .with_action("store keytype", store_key_type))
            .add(Transition::new(KeyType, KeyValueTag, context_tag(1), ValueMode::Descend)
                .with_action("check keyvalue", check_not_null_length))
            .add(Transition::new(KeyValueTag, KeyValue, OCTET_STRING_TAG, ValueMode::Value)
                .with_action("store keyvalue", store_key_value));
        grammar
    });

#[cfg(test)]
mod tests {
    use super::*;
    use ads_asn1::Asn1Decoder;
    use ads_core::CodecError;

    const AES128_KEY: [u8; 25] = [
        0x30, 0x17, // SEQUENCE
        0xA0, 0x03, 0x02, 0x01, 0x11, // [0] INTEGER 17
        0xA1, 0x10, 0x04, 0x0E, // [1] OCTET STRING (14 bytes)
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
    ];

    #[test]
    fn test_decode() {
        let key = Asn1Decoder::new()
            .decode_pdu(&AES128_KEY, &ENCRYPTION_KEY_GRAMMAR)
            .unwrap();
        assert_eq!(key.key_type, EncryptionType::Aes128CtsHmacSha196);
        assert_eq!(key.key_value, (0u8..14).collect::<Vec<_>>());
        assert_eq!(key.encode().unwrap(), AES128_KEY.to_vec());
    }

    #[test]
    fn test_empty_key_value() {
        let bytes = [0x30, 0x09, 0xA0, 0x03, 0x02, 0x01, 0x00, 0xA1, 0x02, 0x04, 0x00];
        let key = EncryptionKey::decode(&bytes).unwrap();
        assert_eq!(key, EncryptionKey::new(EncryptionType::Null, Vec::new()));
    }

    #[test]
    fn test_missing_key_value() {
        let bytes = [0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x11];
        assert!(matches!(
            EncryptionKey::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { offset: 7, .. })
        ));
    }

    #[test]
    fn test_fields_out_of_order() {
        let bytes = [0x30, 0x09, 0xA1, 0x02, 0x04, 0x00, 0xA0, 0x03, 0x02, 0x01, 0x00];
        assert_eq!(
            EncryptionKey::decode(&bytes),
            Err(CodecError::UnexpectedTag {
                grammar: "EncryptionKey",
                state: "Sequence",
                tag: 0xA1,
                offset: 2,
            })
        );
    }
}
