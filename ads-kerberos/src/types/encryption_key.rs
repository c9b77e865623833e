//! EncryptionKey
//!
//! ```text
//! EncryptionKey ::= SEQUENCE {
//!     keytype     [0] Int32,
//!     keyvalue    [1] OCTET STRING
//! }
//! ```

use crate::grammar::encryption_key::ENCRYPTION_KEY_GRAMMAR;
use ads_asn1::{Asn1Decoder, BerEncoder};
use ads_core::CodecResult;
use serde::{Deserialize, Serialize};

/// Encryption types registered for Kerberos (RFC 3961, RFC 4757, RFC 8009)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum EncryptionType {
    #[default]
    Null,
    DesCbcCrc,
    DesCbcMd4,
    DesCbcMd5,
    Des3CbcSha1Kd,
    Aes128CtsHmacSha196,
    Aes256CtsHmacSha196,
    Aes128CtsHmacSha256128,
    Aes256CtsHmacSha384192,
    Rc4Hmac,
    Rc4HmacExp,
    Camellia128CtsCmac,
    Camellia256CtsCmac,
    /// A value without a registered name; a registered value wrapped here
    /// compares equal to its named variant
    Unknown(i32),
}

impl EncryptionType {
    /// Registered number of this type
    pub fn value(self) -> i32 {
        match self {
            EncryptionType::Null => 0,
            EncryptionType::DesCbcCrc => 1,
            EncryptionType::DesCbcMd4 => 2,
            EncryptionType::DesCbcMd5 => 3,
            EncryptionType::Des3CbcSha1Kd => 16,
            EncryptionType::Aes128CtsHmacSha196 => 17,
            EncryptionType::Aes256CtsHmacSha196 => 18,
            EncryptionType::Aes128CtsHmacSha256128 => 19,
            EncryptionType::Aes256CtsHmacSha384192 => 20,
            EncryptionType::Rc4Hmac => 23,
            EncryptionType::Rc4HmacExp => 24,
            EncryptionType::Camellia128CtsCmac => 25,
            EncryptionType::Camellia256CtsCmac => 26,
            EncryptionType::Unknown(value) => value,
        }
    }
}

impl From<i32> for EncryptionType {
    fn from(value: i32) -> Self {
        match value {
            0 => EncryptionType::Null,
            1 => EncryptionType::DesCbcCrc,
            2 => EncryptionType::DesCbcMd4,
            3 => EncryptionType::DesCbcMd5,
            16 => EncryptionType::Des3CbcSha1Kd,
            17 => EncryptionType::Aes128CtsHmacSha196,
            18 => EncryptionType::Aes256CtsHmacSha196,
            19 => EncryptionType::Aes128CtsHmacSha256128,
            20 => EncryptionType::Aes256CtsHmacSha384192,
            23 => EncryptionType::Rc4Hmac,
            24 => EncryptionType::Rc4HmacExp,
            25 => EncryptionType::Camellia128CtsCmac,
            26 => EncryptionType::Camellia256CtsCmac,
            other => EncryptionType::Unknown(other),
        }
    }
}

// Equality and hashing follow the wire number
impl PartialEq for EncryptionType {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for EncryptionType {}

impl std::hash::Hash for EncryptionType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

/// A session or sub-session key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptionKey {
    pub key_type: EncryptionType,
    #[serde(with = "serde_bytes")]
    pub key_value: Vec<u8>,
}

impl EncryptionKey {
    pub fn new(key_type: EncryptionType, key_value: Vec<u8>) -> Self {
        Self {
            key_type,
            key_value,
        }
    }

    /// Encode as DER
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut fields = BerEncoder::new();
        fields.encode_explicit(0, |e| e.encode_i32(self.key_type.value()))?;
        fields.encode_explicit(1, |e| e.encode_octet_string(&self.key_value))?;

        let mut encoder = BerEncoder::with_capacity(fields.len() + 6);
        encoder.encode_sequence(fields.as_bytes())?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete EncryptionKey
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &ENCRYPTION_KEY_GRAMMAR)
    }
}
