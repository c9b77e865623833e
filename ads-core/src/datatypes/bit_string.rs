//! ASN.1 BIT STRING value

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arbitrary string of bits, most significant bit of the first byte first.
///
/// The BER value of a BIT STRING is one leading octet holding the number of
/// unused bits in the last byte (0-7), followed by the bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitString {
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
    num_bits: usize,
}

impl BitString {
    /// Construct a new bit string object.
    ///
    /// # Arguments
    ///
    /// * `bit_string` - The bit string as a byte array
    /// * `num_bits` - The number of bits
    ///
    /// # Errors
    ///
    /// Returns an error if `num_bits` does not fit in `bit_string`, or if
    /// `bit_string` has a whole unused trailing byte.
    pub fn new(bit_string: Vec<u8>, num_bits: usize) -> CodecResult<Self> {
        if num_bits > bit_string.len() * 8 {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                format!(
                    "too short to hold all bits. Need {} bytes for {} bits",
                    num_bits.div_ceil(8),
                    num_bits
                ),
            ));
        }
        if bit_string.len() > num_bits.div_ceil(8) {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                format!("{} bytes for {} bits", bit_string.len(), num_bits),
            ));
        }

        Ok(Self {
            bytes: bit_string,
            num_bits,
        })
    }

    /// Bit string using every bit of `bytes`
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let num_bits = bytes.len() * 8;
        Self { bytes, num_bits }
    }

    /// Create an all-zero bit string of `num_bits` bits
    pub fn zeroed(num_bits: usize) -> Self {
        Self {
            bytes: vec![0; num_bits.div_ceil(8)],
            num_bits,
        }
    }

    /// Decode the BER value octets of a BIT STRING
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, the unused-bits octet is above
    /// 7, or unused bits are announced for an empty bit string.
    pub fn from_ber_value(value: &[u8]) -> CodecResult<Self> {
        let (&unused_bits, bytes) = value.split_first().ok_or_else(|| {
            CodecError::invalid_field("BIT STRING", "missing unused-bits octet")
        })?;

        if unused_bits > 7 {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                format!("invalid unused bits: {} (must be 0-7)", unused_bits),
            ));
        }
        if bytes.is_empty() && unused_bits != 0 {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                "unused bits announced for an empty bit string",
            ));
        }

        Ok(Self {
            bytes: bytes.to_vec(),
            num_bits: bytes.len() * 8 - unused_bits as usize,
        })
    }

    /// Encode as BER value octets (unused-bits octet followed by the bytes)
    pub fn to_ber_value(&self) -> Vec<u8> {
        let mut value = Vec::with_capacity(self.bytes.len() + 1);
        value.push(self.unused_bits());
        value.extend_from_slice(&self.bytes);
        value
    }

    /// Number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        (self.bytes.len() * 8 - self.num_bits) as u8
    }

    /// Get the bit string as byte array.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of bits in the byte array.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the bit at a specific position
    ///
    /// # Arguments
    /// * `index` - The bit index (0-based, MSB of the first byte is 0)
    pub fn get_bit(&self, index: usize) -> CodecResult<bool> {
        if index >= self.num_bits {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                format!("bit index {} out of bounds (num_bits: {})", index, self.num_bits),
            ));
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8); // MSB first
        Ok((self.bytes[byte_index] >> bit_index) & 1 == 1)
    }

    /// Set the bit at a specific position
    pub fn set_bit(&mut self, index: usize, value: bool) -> CodecResult<()> {
        if index >= self.num_bits {
            return Err(CodecError::invalid_field(
                "BIT STRING",
                format!("bit index {} out of bounds (num_bits: {})", index, self.num_bits),
            ));
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8); // MSB first
        if value {
            self.bytes[byte_index] |= 1 << bit_index;
        } else {
            self.bytes[byte_index] &= !(1 << bit_index);
        }
        Ok(())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.num_bits {
            let bit = (self.bytes[index / 8] >> (7 - index % 8)) & 1;
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_new() {
        let bytes = vec![0xFF, 0x00, 0xAA];
        let bit_string = BitString::new(bytes.clone(), 24).unwrap();
        assert_eq!(bit_string.as_bytes(), &bytes);
        assert_eq!(bit_string.num_bits(), 24);
        assert_eq!(bit_string.unused_bits(), 0);
    }

    #[test]
    fn test_bit_string_invalid() {
        assert!(BitString::new(vec![0xFF], 16).is_err());
        assert!(BitString::new(vec![0xFF, 0x00], 4).is_err());
    }

    #[test]
    fn test_bit_string_partial_byte() {
        let bit_string = BitString::new(vec![0xF0], 4).unwrap();
        assert_eq!(bit_string.num_bits(), 4);
        assert_eq!(bit_string.to_ber_value(), vec![0x04, 0xF0]);
        assert_eq!(bit_string.to_string(), "1111");
    }

    #[test]
    fn test_from_ber_value() {
        let bit_string = BitString::from_ber_value(&[0x00, 0x50, 0x80, 0x00, 0x00]).unwrap();
        assert_eq!(bit_string.num_bits(), 32);
        assert!(!bit_string.get_bit(0).unwrap());
        assert!(bit_string.get_bit(1).unwrap());
        assert!(bit_string.get_bit(3).unwrap());
        assert!(bit_string.get_bit(8).unwrap());
        assert!(bit_string.get_bit(32).is_err());

        assert!(BitString::from_ber_value(&[]).is_err());
        assert!(BitString::from_ber_value(&[0x08, 0x00]).is_err());
        assert!(BitString::from_ber_value(&[0x01]).is_err());
        assert_eq!(BitString::from_ber_value(&[0x00]).unwrap().num_bits(), 0);
    }

    #[test]
    fn test_set_bit() {
        let mut bit_string = BitString::zeroed(32);
        bit_string.set_bit(1, true).unwrap();
        bit_string.set_bit(31, true).unwrap();
        assert_eq!(bit_string.as_bytes(), &[0x40, 0x00, 0x00, 0x01]);
        bit_string.set_bit(1, false).unwrap();
        assert_eq!(bit_string.as_bytes(), &[0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_from_bytes() {
        let bit_string = BitString::from_bytes(vec![0x50, 0x80]);
        assert_eq!(bit_string.num_bits(), 16);
        assert_eq!(bit_string.to_ber_value(), vec![0x00, 0x50, 0x80]);
    }
}
