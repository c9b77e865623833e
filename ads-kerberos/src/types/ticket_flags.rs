//! TicketFlags
//!
//! ```text
//! TicketFlags   ::= KerberosFlags
//! KerberosFlags ::= BIT STRING (SIZE (32..MAX))
//! ```
//!
//! Bit 0 is the most significant bit of the first octet, so the flags read
//! as a big-endian `u32`: bit `n` is `1 << (31 - n)`.

use ads_core::{BitString, CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits carried by [`TicketFlags`]
pub const TICKET_FLAGS_BITS: usize = 32;

/// Named ticket flags (RFC 4120 section 5.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketFlag {
    Reserved = 0,
    Forwardable = 1,
    Forwarded = 2,
    Proxiable = 3,
    Proxy = 4,
    MayPostdate = 5,
    Postdated = 6,
    Invalid = 7,
    Renewable = 8,
    Initial = 9,
    PreAuthent = 10,
    HwAuthent = 11,
    TransitedPolicyChecked = 12,
    OkAsDelegate = 13,
}

impl TicketFlag {
    pub const ALL: [TicketFlag; 14] = [
        TicketFlag::Reserved,
        TicketFlag::Forwardable,
        TicketFlag::Forwarded,
        TicketFlag::Proxiable,
        TicketFlag::Proxy,
        TicketFlag::MayPostdate,
        TicketFlag::Postdated,
        TicketFlag::Invalid,
        TicketFlag::Renewable,
        TicketFlag::Initial,
        TicketFlag::PreAuthent,
        TicketFlag::HwAuthent,
        TicketFlag::TransitedPolicyChecked,
        TicketFlag::OkAsDelegate,
    ];

    /// Bit position, 0 being the first bit on the wire
    pub fn bit(self) -> usize {
        self as usize
    }

    fn mask(self) -> u32 {
        1 << (31 - self.bit())
    }

    pub fn name(self) -> &'static str {
        match self {
            TicketFlag::Reserved => "reserved",
            TicketFlag::Forwardable => "forwardable",
            TicketFlag::Forwarded => "forwarded",
            TicketFlag::Proxiable => "proxiable",
            TicketFlag::Proxy => "proxy",
            TicketFlag::MayPostdate => "may-postdate",
            TicketFlag::Postdated => "postdated",
            TicketFlag::Invalid => "invalid",
            TicketFlag::Renewable => "renewable",
            TicketFlag::Initial => "initial",
            TicketFlag::PreAuthent => "pre-authent",
            TicketFlag::HwAuthent => "hw-authent",
            TicketFlag::TransitedPolicyChecked => "transited-policy-checked",
            TicketFlag::OkAsDelegate => "ok-as-delegate",
        }
    }
}

/// The 32 ticket flag bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketFlags {
    bits: u32,
}

impl TicketFlags {
    pub fn new(bits: u32) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn contains(&self, flag: TicketFlag) -> bool {
        self.bits & flag.mask() != 0
    }

    pub fn insert(&mut self, flag: TicketFlag) {
        self.bits |= flag.mask();
    }

    pub fn remove(&mut self, flag: TicketFlag) {
        self.bits &= !flag.mask();
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, flag: TicketFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Named flags that are set
    pub fn iter(&self) -> impl Iterator<Item = TicketFlag> + '_ {
        TicketFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }

    /// Read the flags from a decoded BIT STRING
    ///
    /// # Error Handling
    /// Fails with [`CodecError::InvalidFieldValue`] when fewer than 32 bits
    /// are present. Bits past the 32nd are ignored.
    pub fn from_bit_string(bit_string: &BitString) -> CodecResult<Self> {
        if bit_string.num_bits() < TICKET_FLAGS_BITS {
            return Err(CodecError::invalid_field(
                "flags",
                format!(
                    "{} bits, at least {} required",
                    bit_string.num_bits(),
                    TICKET_FLAGS_BITS
                ),
            ));
        }
        if bit_string.num_bits() > TICKET_FLAGS_BITS {
            log::debug!(
                "ignoring {} ticket flag bits past the first {}",
                bit_string.num_bits() - TICKET_FLAGS_BITS,
                TICKET_FLAGS_BITS
            );
        }

        let bytes = bit_string.as_bytes();
        Ok(Self::new(u32::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ])))
    }

    /// The flags as a 32-bit BIT STRING
    pub fn to_bit_string(&self) -> BitString {
        BitString::from_bytes(self.bits.to_be_bytes().to_vec())
    }
}

impl From<u32> for TicketFlags {
    fn from(bits: u32) -> Self {
        Self::new(bits)
    }
}

/// Names of the set flags separated by `|`
impl fmt::Display for TicketFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(TicketFlag::name).collect();
        write!(f, "{}", names.join("|"))
    }
}
