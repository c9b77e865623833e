//! LastReq
//!
//! ```text
//! LastReq ::= SEQUENCE OF SEQUENCE {
//!     lr-type     [0] Int32,
//!     lr-value    [1] KerberosTime
//! }
//! ```

use crate::grammar::last_req::LAST_REQ_GRAMMAR;
use crate::types::KerberosTime;
use ads_asn1::{Asn1Decoder, BerEncoder};
use ads_core::CodecResult;
use serde::{Deserialize, Serialize};

/// Meaning of an `lr-type` value, ignoring its sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LastReqType {
    None,
    LastInitialTgtRequest,
    LastInitialRequest,
    NewestTgtUsed,
    LastRenewal,
    LastRequest,
    PasswordExpiration,
    AccountExpiration,
    Other(i32),
}

impl From<i32> for LastReqType {
    fn from(value: i32) -> Self {
        match value.unsigned_abs() {
            0 => LastReqType::None,
            1 => LastReqType::LastInitialTgtRequest,
            2 => LastReqType::LastInitialRequest,
            3 => LastReqType::NewestTgtUsed,
            4 => LastReqType::LastRenewal,
            5 => LastReqType::LastRequest,
            6 => LastReqType::PasswordExpiration,
            7 => LastReqType::AccountExpiration,
            _ => LastReqType::Other(value),
        }
    }
}

/// One `lr-type`/`lr-value` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LastReqEntry {
    pub lr_type: i32,
    pub lr_value: KerberosTime,
}

impl LastReqEntry {
    pub fn new(lr_type: i32, lr_value: KerberosTime) -> Self {
        Self { lr_type, lr_value }
    }

    pub fn kind(&self) -> LastReqType {
        LastReqType::from(self.lr_type)
    }

    /// A negative type carries information for the local realm only
    pub fn is_local(&self) -> bool {
        self.lr_type < 0
    }

    fn encode_into(&self, encoder: &mut BerEncoder) -> CodecResult<()> {
        let mut fields = BerEncoder::new();
        fields.encode_explicit(0, |e| e.encode_i32(self.lr_type))?;
        fields.encode_explicit(1, |e| e.encode_generalized_time(&self.lr_value))?;
        encoder.encode_sequence(fields.as_bytes())
    }
}

/// Times of the last requests made by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LastReq(pub Vec<LastReqEntry>);

impl LastReq {
    pub fn new(entries: Vec<LastReqEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[LastReqEntry] {
        &self.0
    }

    /// Encode as DER
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut entries = BerEncoder::new();
        for entry in &self.0 {
            entry.encode_into(&mut entries)?;
        }

        let mut encoder = BerEncoder::with_capacity(entries.len() + 6);
        encoder.encode_sequence(entries.as_bytes())?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete LastReq
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &LAST_REQ_GRAMMAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ignores_sign() {
        let time = KerberosTime::from_unix_seconds(0).unwrap();
        assert_eq!(LastReqEntry::new(6, time).kind(), LastReqType::PasswordExpiration);
        assert_eq!(LastReqEntry::new(-6, time).kind(), LastReqType::PasswordExpiration);
        assert!(LastReqEntry::new(-6, time).is_local());
        assert!(!LastReqEntry::new(0, time).is_local());
        assert_eq!(LastReqEntry::new(42, time).kind(), LastReqType::Other(42));
    }

    #[test]
    fn test_encode_fixture() {
        let last_req = LastReq::new(vec![LastReqEntry::new(
            0,
            KerberosTime::parse("20240101000000Z").unwrap(),
        )]);
        let mut expected = vec![
            0x30, 0x1A, // SEQUENCE OF
            0x30, 0x18, // SEQUENCE
            0xA0, 0x03, 0x02, 0x01, 0x00, // [0] INTEGER 0
            0xA1, 0x11, 0x18, 0x0F, // [1] GeneralizedTime
        ];
        expected.extend_from_slice(b"20240101000000Z");
        assert_eq!(last_req.encode().unwrap(), expected);
    }
}
