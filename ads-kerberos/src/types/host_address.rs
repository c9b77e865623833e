//! HostAddress and HostAddresses
//!
//! ```text
//! HostAddress ::= SEQUENCE {
//!     addr-type   [0] Int32,
//!     address     [1] OCTET STRING
//! }
//!
//! HostAddresses ::= SEQUENCE OF HostAddress
//! ```

use crate::grammar::host_addresses::{HOST_ADDRESSES_GRAMMAR, HOST_ADDRESS_GRAMMAR};
use ads_asn1::{Asn1Decoder, BerEncoder};
use ads_core::CodecResult;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Address families (RFC 4120 section 7.5.3)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum HostAddrType {
    #[default]
    Ipv4,
    Directional,
    ChaosNet,
    Xns,
    Iso,
    DecnetPhaseIv,
    AppleTalkDdp,
    NetBios,
    Ipv6,
    /// Unassigned value; an assigned value wrapped here compares equal to
    /// its named variant
    Other(i32),
}

impl HostAddrType {
    pub fn value(self) -> i32 {
        match self {
            HostAddrType::Ipv4 => 2,
            HostAddrType::Directional => 3,
            HostAddrType::ChaosNet => 5,
            HostAddrType::Xns => 6,
            HostAddrType::Iso => 7,
            HostAddrType::DecnetPhaseIv => 12,
            HostAddrType::AppleTalkDdp => 16,
            HostAddrType::NetBios => 20,
            HostAddrType::Ipv6 => 24,
            HostAddrType::Other(value) => value,
        }
    }
}

impl From<i32> for HostAddrType {
    fn from(value: i32) -> Self {
        match value {
            2 => HostAddrType::Ipv4,
            3 => HostAddrType::Directional,
            5 => HostAddrType::ChaosNet,
            6 => HostAddrType::Xns,
            7 => HostAddrType::Iso,
            12 => HostAddrType::DecnetPhaseIv,
            16 => HostAddrType::AppleTalkDdp,
            20 => HostAddrType::NetBios,
            24 => HostAddrType::Ipv6,
            other => HostAddrType::Other(other),
        }
    }
}

// Equality and hashing follow the wire number
impl PartialEq for HostAddrType {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for HostAddrType {}

impl std::hash::Hash for HostAddrType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

/// One client address
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAddress {
    pub addr_type: HostAddrType,
    #[serde(with = "serde_bytes")]
    pub address: Vec<u8>,
}

impl HostAddress {
    pub fn new(addr_type: HostAddrType, address: Vec<u8>) -> Self {
        Self { addr_type, address }
    }

    pub fn ipv4(address: Ipv4Addr) -> Self {
        Self::new(HostAddrType::Ipv4, address.octets().to_vec())
    }

    pub fn ipv6(address: Ipv6Addr) -> Self {
        Self::new(HostAddrType::Ipv6, address.octets().to_vec())
    }

    /// Encode as DER
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut encoder = BerEncoder::new();
        self.encode_into(&mut encoder)?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete HostAddress
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &HOST_ADDRESS_GRAMMAR)
    }

    fn encode_into(&self, encoder: &mut BerEncoder) -> CodecResult<()> {
        let mut fields = BerEncoder::new();
        fields.encode_explicit(0, |e| e.encode_i32(self.addr_type.value()))?;
        fields.encode_explicit(1, |e| e.encode_octet_string(&self.address))?;
        encoder.encode_sequence(fields.as_bytes())
    }
}

/// Addresses from which a ticket may be used
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAddresses(pub Vec<HostAddress>);

impl HostAddresses {
    pub fn new(addresses: Vec<HostAddress>) -> Self {
        Self(addresses)
    }

    pub fn addresses(&self) -> &[HostAddress] {
        &self.0
    }

    /// Encode as DER
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut addresses = BerEncoder::new();
        for address in &self.0 {
            address.encode_into(&mut addresses)?;
        }

        let mut encoder = BerEncoder::with_capacity(addresses.len() + 6);
        encoder.encode_sequence(addresses.as_bytes())?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete HostAddresses
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &HOST_ADDRESSES_GRAMMAR)
    }
}
