//! BER length octets
//!
//! Short form:
//! ```text
//! Byte: 0 L L L L L L L        (length 0-127)
//! ```
//!
//! Long form:
//! ```text
//! First byte:      1 N N N N N N N  (N = number of length bytes, 1-4)
//! Following bytes: L L L L L L L L  (big-endian length value, no leading zero byte)
//! ```

use ads_core::{CodecError, CodecResult};

/// Largest length encodable in the short form
pub const MAX_SHORT_LENGTH: u32 = 0x7F;

/// Largest number of octets following a long-form first byte
pub const MAX_LENGTH_OCTETS: usize = 4;

/// Number of bytes `encode_length(length)` produces (1-5)
pub fn length_byte_count(length: u32) -> usize {
    if length <= MAX_SHORT_LENGTH {
        1
    } else {
        1 + significant_octets(length)
    }
}

/// Minimal number of big-endian octets holding `length` (at least 1)
fn significant_octets(length: u32) -> usize {
    let bits = 32 - length.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

/// Encode a length in short or long form
pub fn encode_length(length: u32) -> Vec<u8> {
    let mut result = Vec::with_capacity(length_byte_count(length));
    encode_length_into(length, &mut result);
    result
}

/// Append the encoded length to `out`
pub fn encode_length_into(length: u32, out: &mut Vec<u8>) {
    if length <= MAX_SHORT_LENGTH {
        out.push(length as u8);
        return;
    }

    let octets = significant_octets(length);
    out.push(0x80 | octets as u8);
    out.extend_from_slice(&length.to_be_bytes()[4 - octets..]);
}

/// Decode the length octets starting at `cursor`
///
/// # Returns
/// `(length, bytes_consumed)`
///
/// # Error Handling
/// Fails with [`CodecError::MalformedLength`] on indefinite length (`0x80`),
/// more than four length octets, or a buffer that ends inside the length.
pub fn decode_length(bytes: &[u8], cursor: usize) -> CodecResult<(u32, usize)> {
    let first_byte = *bytes
        .get(cursor)
        .ok_or_else(|| CodecError::malformed_length(cursor, "buffer exhausted before length"))?;

    if first_byte & 0x80 == 0 {
        return Ok((first_byte as u32, 1));
    }

    let octets = long_form_octets(first_byte, cursor)?;
    let end = cursor + 1 + octets;
    let length_bytes = bytes.get(cursor + 1..end).ok_or_else(|| {
        CodecError::malformed_length(
            cursor,
            format!(
                "buffer too short for long form length: need {} bytes, got {}",
                1 + octets,
                bytes.len().saturating_sub(cursor)
            ),
        )
    })?;

    let length = length_bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);
    Ok((length, 1 + octets))
}

/// Validate a long-form first byte and return the number of octets that follow
pub(crate) fn long_form_octets(first_byte: u8, offset: usize) -> CodecResult<usize> {
    let octets = (first_byte & 0x7F) as usize;
    if octets == 0 {
        return Err(CodecError::malformed_length(
            offset,
            "indefinite length encoding not supported",
        ));
    }
    if octets > MAX_LENGTH_OCTETS {
        return Err(CodecError::malformed_length(
            offset,
            format!("length too large: {} octets (max {})", octets, MAX_LENGTH_OCTETS),
        ));
    }
    Ok(octets)
}

/// Typed BER length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BerLength {
    /// Single-octet form (0-127)
    Short(u8),
    /// `0x80 | n` followed by `n` big-endian octets
    Long(u32),
}

impl BerLength {
    /// Pick the minimal form for `length`
    pub fn from_length(length: u32) -> Self {
        if length <= MAX_SHORT_LENGTH {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Length value carried by either form
    pub fn length(&self) -> u32 {
        match self {
            BerLength::Short(length) => *length as u32,
            BerLength::Long(length) => *length,
        }
    }

    /// Number of octets this length occupies once encoded
    pub fn encoded_len(&self) -> usize {
        length_byte_count(self.length())
    }

    /// Encode in minimal form
    pub fn encode(&self) -> Vec<u8> {
        encode_length(self.length())
    }

    /// Decode the length octets at `cursor`
    ///
    /// A long-form encoding of a value below 128 decodes as `Short`.
    ///
    /// # Returns
    /// `(length, bytes_consumed)`
    pub fn decode(bytes: &[u8], cursor: usize) -> CodecResult<(Self, usize)> {
        let (length, consumed) = decode_length(bytes, cursor)?;
        Ok((Self::from_length(length), consumed))
    }
}

impl From<u32> for BerLength {
    fn from(length: u32) -> Self {
        Self::from_length(length)
    }
}
