//! BER value octets for the primitive types the grammars decode
//!
//! INTEGER values use minimal two's-complement big-endian form: the fewest
//! bytes whose sign extension reproduces the value.

use ads_core::{BitString, CodecError, CodecResult, GeneralizedTime};

/// Minimal two's-complement byte count for an `i32` (1-4)
pub fn byte_count_i32(value: i32) -> usize {
    let redundant = if value < 0 {
        (!value).leading_zeros()
    } else {
        value.leading_zeros()
    };
    // One sign bit on top of the significant bits
    (32 - redundant as usize + 1).div_ceil(8)
}

/// Minimal two's-complement byte count for an `i64` (1-8)
pub fn byte_count_i64(value: i64) -> usize {
    let redundant = if value < 0 {
        (!value).leading_zeros()
    } else {
        value.leading_zeros()
    };
    (64 - redundant as usize + 1).div_ceil(8)
}

/// Encode an `i32` as minimal two's-complement big-endian bytes
pub fn encode_i32(value: i32) -> Vec<u8> {
    value.to_be_bytes()[4 - byte_count_i32(value)..].to_vec()
}

/// Encode an `i64` as minimal two's-complement big-endian bytes
pub fn encode_i64(value: i64) -> Vec<u8> {
    value.to_be_bytes()[8 - byte_count_i64(value)..].to_vec()
}

/// Decode big-endian two's-complement bytes into an `i32`
///
/// # Error Handling
/// Returns [`CodecError::IntegerOverflow`] for empty input or more than four
/// bytes.
pub fn decode_i32(bytes: &[u8]) -> CodecResult<i32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return Err(CodecError::IntegerOverflow {
            length: bytes.len(),
        });
    }
    let seed: i32 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    Ok(bytes
        .iter()
        .fold(seed, |acc, &byte| (acc << 8) | byte as i32))
}

/// Decode big-endian two's-complement bytes into an `i64`
///
/// # Error Handling
/// Returns [`CodecError::IntegerOverflow`] for empty input or more than
/// eight bytes.
pub fn decode_i64(bytes: &[u8]) -> CodecResult<i64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(CodecError::IntegerOverflow {
            length: bytes.len(),
        });
    }
    let seed: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    Ok(bytes
        .iter()
        .fold(seed, |acc, &byte| (acc << 8) | byte as i64))
}

/// Decode a Kerberos `UInt32`
///
/// Negative values that fit an `i32` are reinterpreted as their unsigned
/// 32-bit pattern, since some encoders write the nonce as a signed Int32.
pub fn decode_u32(field: &'static str, bytes: &[u8]) -> CodecResult<u32> {
    let value = decode_i64(bytes)?;
    if let Ok(unsigned) = u32::try_from(value) {
        return Ok(unsigned);
    }
    i32::try_from(value)
        .map(|signed| signed as u32)
        .map_err(|_| CodecError::invalid_field(field, format!("{} does not fit 32 bits", value)))
}

/// Decode a BIT STRING value
pub fn decode_bit_string(bytes: &[u8]) -> CodecResult<BitString> {
    BitString::from_ber_value(bytes)
}

/// Decode a GeneralizedTime value
pub fn decode_generalized_time(bytes: &[u8]) -> CodecResult<GeneralizedTime> {
    GeneralizedTime::from_bytes(bytes)
}

/// Decode a GeneralString / KerberosString value
///
/// The string must be valid UTF-8 (Kerberos restricts it to IA5 in
/// practice).
pub fn decode_general_string(field: &'static str, bytes: &[u8]) -> CodecResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| CodecError::invalid_field(field, "string is not valid UTF-8"))
}
