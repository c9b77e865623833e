//! BER encoder for ASN.1 structures
//!
//! # Usage Example
//!
//! ```rust
//! use ads_asn1::ber::BerEncoder;
//!
//! let mut inner = BerEncoder::new();
//! inner.encode_i32(256).unwrap();
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_context_specific(2, inner.as_bytes(), true).unwrap();
//! assert_eq!(encoder.into_bytes(), vec![0xA2, 0x04, 0x02, 0x02, 0x01, 0x00]);
//! ```

use crate::ber::length::{encode_length_into, length_byte_count};
use crate::ber::types::BerTag;
use crate::ber::value::{encode_i32, encode_i64};
use ads_core::{BitString, CodecError, CodecResult, GeneralizedTime};

/// BER encoder for ASN.1 structures
///
/// Each encoded value is a TLV (Tag-Length-Value) triplet appended to an
/// internal `Vec<u8>`. Constructed values are built inside out: encode the
/// members into a separate encoder, then wrap its bytes with
/// [`encode_sequence`](Self::encode_sequence) or
/// [`encode_context_specific`](Self::encode_context_specific).
#[derive(Debug, Clone, Default)]
pub struct BerEncoder {
    buffer: Vec<u8>,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Error Handling
    /// Fails if the value is longer than the four-octet length form allows.
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) -> CodecResult<()> {
        let length = u32::try_from(value.len()).map_err(|_| CodecError::PduTooLarge {
            length: value.len(),
            max: u32::MAX as usize,
        })?;

        self.buffer
            .reserve(1 + length_byte_count(length) + value.len());
        tag.encode_into(&mut self.buffer);
        encode_length_into(length, &mut self.buffer);
        self.buffer.extend_from_slice(value);

        Ok(())
    }

    /// Encode an INTEGER from an `i32`
    pub fn encode_i32(&mut self, value: i32) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 2), &encode_i32(value))
    }

    /// Encode an INTEGER from an `i64`
    pub fn encode_i64(&mut self, value: i64) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 2), &encode_i64(value))
    }

    /// Encode an OCTET STRING
    pub fn encode_octet_string(&mut self, value: &[u8]) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 4), value)
    }

    /// Encode a BIT STRING (unused-bits octet followed by the bytes)
    pub fn encode_bit_string(&mut self, value: &BitString) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 3), &value.to_ber_value())
    }

    /// Encode a GeneralizedTime as `YYYYMMDDHHMMSSZ`
    pub fn encode_generalized_time(&mut self, value: &GeneralizedTime) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 24), &value.to_bytes())
    }

    /// Encode a GeneralString
    pub fn encode_general_string(&mut self, value: &str) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(false, 27), value.as_bytes())
    }

    /// Encode a SEQUENCE or SEQUENCE OF around already-encoded elements
    pub fn encode_sequence(&mut self, elements: &[u8]) -> CodecResult<()> {
        self.encode_tlv(&BerTag::universal(true, 16), elements)
    }

    /// Encode a context-specific tag around already-encoded content
    pub fn encode_context_specific(
        &mut self,
        tag_number: u32,
        value: &[u8],
        constructed: bool,
    ) -> CodecResult<()> {
        self.encode_tlv(&BerTag::context_specific(constructed, tag_number), value)
    }

    /// Encode an application tag around already-encoded content
    pub fn encode_application(
        &mut self,
        tag_number: u32,
        value: &[u8],
        constructed: bool,
    ) -> CodecResult<()> {
        self.encode_tlv(&BerTag::application(constructed, tag_number), value)
    }

    /// Encode an explicitly tagged field: `[tag_number]` wrapping whatever
    /// `encode_inner` writes
    pub fn encode_explicit<F>(&mut self, tag_number: u32, encode_inner: F) -> CodecResult<()>
    where
        F: FnOnce(&mut BerEncoder) -> CodecResult<()>,
    {
        let mut inner = BerEncoder::new();
        encode_inner(&mut inner)?;
        self.encode_context_specific(tag_number, inner.as_bytes(), true)
    }

    /// Append bytes that are already a complete TLV
    pub fn append_raw(&mut self, encoded: &[u8]) {
        self.buffer.extend_from_slice(encoded);
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of encoded bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been encoded yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_integer() {
        let mut encoder = BerEncoder::new();
        encoder.encode_i32(128).unwrap();
        assert_eq!(encoder.into_bytes(), vec![0x02, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn test_encode_octet_string() {
        let mut encoder = BerEncoder::new();
        encoder.encode_octet_string(b"Hello").unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes[0], 0x04); // OCTET STRING tag
        assert_eq!(bytes[1], 5); // Length
    }

    #[test]
    fn test_encode_long_value() {
        let mut encoder = BerEncoder::new();
        encoder.encode_octet_string(&[0xAB; 256]).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..4], &[0x04, 0x82, 0x01, 0x00]);
        assert_eq!(bytes.len(), 4 + 256);
    }

    #[test]
    fn test_encode_sequence() {
        let mut encoder = BerEncoder::new();
        let mut element_encoder = BerEncoder::new();
        element_encoder.encode_i32(123).unwrap();
        encoder.encode_sequence(element_encoder.as_bytes()).unwrap();
        assert_eq!(encoder.into_bytes(), vec![0x30, 0x03, 0x02, 0x01, 0x7B]);
    }

    #[test]
    fn test_encode_explicit() {
        let mut encoder = BerEncoder::new();
        encoder
            .encode_explicit(9, |inner| inner.encode_general_string("EXAMPLE.COM"))
            .unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..4], &[0xA9, 0x0D, 0x1B, 0x0B]);
        assert_eq!(&bytes[4..], b"EXAMPLE.COM");
    }

    #[test]
    fn test_encode_bit_string_and_time() {
        let mut encoder = BerEncoder::new();
        encoder
            .encode_bit_string(&BitString::new(vec![0x50, 0x00, 0x00, 0x00], 32).unwrap())
            .unwrap();
        encoder
            .encode_generalized_time(&GeneralizedTime::from_unix_seconds(0).unwrap())
            .unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..7], &[0x03, 0x05, 0x00, 0x50, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[7..9], &[0x18, 0x0F]);
        assert_eq!(&bytes[9..], b"19700101000000Z");
    }
}
