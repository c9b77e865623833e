//! BER tag types and well-known tag bytes

use ads_core::{CodecError, CodecResult};
use std::fmt;

/// BOOLEAN, universal primitive tag 1
pub const BOOLEAN_TAG: u8 = 0x01;
/// INTEGER, universal primitive tag 2
pub const INTEGER_TAG: u8 = 0x02;
/// BIT STRING, universal primitive tag 3
pub const BIT_STRING_TAG: u8 = 0x03;
/// OCTET STRING, universal primitive tag 4
pub const OCTET_STRING_TAG: u8 = 0x04;
/// GeneralizedTime, universal primitive tag 24
pub const GENERALIZED_TIME_TAG: u8 = 0x18;
/// GeneralString, universal primitive tag 27
pub const GENERAL_STRING_TAG: u8 = 0x1B;
/// SEQUENCE / SEQUENCE OF, universal constructed tag 16
pub const SEQUENCE_TAG: u8 = 0x30;

const CONSTRUCTED_BIT: u8 = 0x20;

/// Single-byte tag of a constructed context-specific `[number]`
///
/// Only tag numbers 0-30 fit a single byte.
pub const fn context_tag(number: u8) -> u8 {
    0x80 | CONSTRUCTED_BIT | (number & 0x1F)
}

/// Single-byte tag of a constructed `[APPLICATION number]`
pub const fn application_tag(number: u8) -> u8 {
    0x40 | CONSTRUCTED_BIT | (number & 0x1F)
}

/// Whether a single-byte tag has the constructed bit set
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED_BIT != 0
}

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from the top two bits of a tag byte
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the value is constructed (contains other values)
/// - **Tag Number**: The actual tag number (0-30 for short form, or extended)
///
/// Extended form (tag number > 30):
/// ```text
/// First byte:  C C P 1 1 1 1 1  (all tag bits set to 1)
/// Following bytes: 1 T T T T T T T  (continuation bytes, last byte has bit 8 = 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    /// Create a new BER tag
    pub fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Interpret a single tag byte (tag numbers 0-30)
    pub fn from_byte(byte: u8) -> Self {
        Self::new(
            BerTagClass::from_bits(byte),
            is_constructed(byte),
            (byte & 0x1F) as u32,
        )
    }

    /// Get tag class
    pub fn class(&self) -> BerTagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Encode tag to bytes
    ///
    /// Tag numbers up to 30 use the single-byte form, larger numbers the
    /// extended form.
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(1);
        self.encode_into(&mut result);
        result
    }

    /// Append the encoded tag to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { CONSTRUCTED_BIT } else { 0x00 };

        if self.number <= 30 {
            out.push(class_bits | constructed_bit | (self.number as u8 & 0x1F));
            return;
        }

        out.push(class_bits | constructed_bit | 0x1F);

        // Base-128, most significant group first
        let groups = (32 - self.number.leading_zeros()).div_ceil(7);
        for i in (0..groups).rev() {
            let group = ((self.number >> (i * 7)) & 0x7F) as u8;
            if i > 0 {
                out.push(group | 0x80);
            } else {
                out.push(group);
            }
        }
    }

    /// Decode tag from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerTag, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Fails on an empty buffer, a truncated extended tag, or a tag number
    /// wider than 32 bits.
    pub fn decode(data: &[u8]) -> CodecResult<(Self, usize)> {
        let (&first_byte, rest) = data.split_first().ok_or_else(|| {
            CodecError::truncated(0, "empty buffer for tag decoding")
        })?;
        let class = BerTagClass::from_bits(first_byte);
        let constructed = is_constructed(first_byte);
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut tag_number = 0u32;
        for (index, &byte) in rest.iter().enumerate() {
            // Max 5 continuation bytes for u32
            if index >= 5 || tag_number > (u32::MAX >> 7) {
                return Err(CodecError::invalid_field(
                    "tag",
                    "tag number too large or invalid encoding",
                ));
            }
            tag_number = (tag_number << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok((Self::new(class, constructed, tag_number), index + 2));
            }
        }

        Err(CodecError::truncated(
            data.len(),
            "incomplete extended tag encoding",
        ))
    }
}

impl fmt::Display for BerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.constructed { "constructed" } else { "primitive" };
        match self.class {
            BerTagClass::Universal => write!(f, "[UNIVERSAL {}] {}", self.number, form),
            BerTagClass::Application => write!(f, "[APPLICATION {}] {}", self.number, form),
            BerTagClass::ContextSpecific => write!(f, "[{}] {}", self.number, form),
            BerTagClass::Private => write!(f, "[PRIVATE {}] {}", self.number, form),
        }
    }
}
