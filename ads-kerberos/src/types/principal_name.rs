//! PrincipalName
//!
//! ```text
//! PrincipalName ::= SEQUENCE {
//!     name-type   [0] Int32,
//!     name-string [1] SEQUENCE OF KerberosString
//! }
//! ```

use crate::grammar::principal_name::PRINCIPAL_NAME_GRAMMAR;
use ads_asn1::{Asn1Decoder, BerEncoder};
use ads_core::CodecResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Principal name types (RFC 4120 section 6.2, RFC 6806)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PrincipalNameType {
    #[default]
    Unknown,
    Principal,
    SrvInst,
    SrvHst,
    SrvXhst,
    Uid,
    X500Principal,
    SmtpName,
    Enterprise,
    /// Unassigned value; an assigned value wrapped here compares equal to
    /// its named variant
    Other(i32),
}

impl PrincipalNameType {
    pub fn value(self) -> i32 {
        match self {
            PrincipalNameType::Unknown => 0,
            PrincipalNameType::Principal => 1,
            PrincipalNameType::SrvInst => 2,
            PrincipalNameType::SrvHst => 3,
            PrincipalNameType::SrvXhst => 4,
            PrincipalNameType::Uid => 5,
            PrincipalNameType::X500Principal => 6,
            PrincipalNameType::SmtpName => 7,
            PrincipalNameType::Enterprise => 10,
            PrincipalNameType::Other(value) => value,
        }
    }
}

impl From<i32> for PrincipalNameType {
    fn from(value: i32) -> Self {
        match value {
            0 => PrincipalNameType::Unknown,
            1 => PrincipalNameType::Principal,
            2 => PrincipalNameType::SrvInst,
            3 => PrincipalNameType::SrvHst,
            4 => PrincipalNameType::SrvXhst,
            5 => PrincipalNameType::Uid,
            6 => PrincipalNameType::X500Principal,
            7 => PrincipalNameType::SmtpName,
            10 => PrincipalNameType::Enterprise,
            other => PrincipalNameType::Other(other),
        }
    }
}

// Equality and hashing follow the wire number
impl PartialEq for PrincipalNameType {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for PrincipalNameType {}

impl std::hash::Hash for PrincipalNameType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

/// A client or service name, without its realm
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalName {
    pub name_type: PrincipalNameType,
    pub name_string: Vec<String>,
}

impl PrincipalName {
    pub fn new(name_type: PrincipalNameType, name_string: Vec<String>) -> Self {
        Self {
            name_type,
            name_string,
        }
    }

    /// Encode as DER
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut components = BerEncoder::new();
        for component in &self.name_string {
            components.encode_general_string(component)?;
        }

        let mut fields = BerEncoder::new();
        fields.encode_explicit(0, |e| e.encode_i32(self.name_type.value()))?;
        fields.encode_explicit(1, |e| e.encode_sequence(components.as_bytes()))?;

        let mut encoder = BerEncoder::with_capacity(fields.len() + 6);
        encoder.encode_sequence(fields.as_bytes())?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete PrincipalName
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &PRINCIPAL_NAME_GRAMMAR)
    }
}

/// Components joined with `/`, e.g. `krbtgt/EXAMPLE.COM`
impl fmt::Display for PrincipalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_string.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_type_numbers() {
        assert_eq!(PrincipalNameType::from(2), PrincipalNameType::SrvInst);
        assert_eq!(PrincipalNameType::from(10), PrincipalNameType::Enterprise);
        assert_eq!(PrincipalNameType::from(8), PrincipalNameType::Other(8));
        assert_eq!(PrincipalNameType::Enterprise.value(), 10);
    }

    #[test]
    fn test_encode_fixture() {
        let name = PrincipalName::new(
            PrincipalNameType::SrvInst,
            vec!["krbtgt".to_string(), "A".to_string()],
        );
        let mut expected = vec![
            0x30, 0x14, // SEQUENCE
            0xA0, 0x03, 0x02, 0x01, 0x02, // [0] INTEGER 2
            0xA1, 0x0D, 0x30, 0x0B, // [1] SEQUENCE OF
            0x1B, 0x06,
        ];
        expected.extend_from_slice(b"krbtgt");
        expected.extend_from_slice(&[0x1B, 0x01, b'A']);
        assert_eq!(name.encode().unwrap(), expected);
        assert_eq!(name.to_string(), "krbtgt/A");
    }

    #[test]
    fn test_other_with_assigned_number_round_trips() {
        let name = PrincipalName::new(PrincipalNameType::Other(1), vec!["bob".to_string()]);
        let decoded = PrincipalName::decode(&name.encode().unwrap()).unwrap();
        assert!(matches!(decoded.name_type, PrincipalNameType::Principal));
        assert_eq!(decoded, name);
    }
}
