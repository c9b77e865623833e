//! Decoder limits

/// Default upper bound for one PDU (1 MiB)
pub const DEFAULT_MAX_PDU_SIZE: usize = 1 << 20;

/// Default upper bound for nested constructed values
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Limits applied by [`Asn1Decoder`](crate::grammar::Asn1Decoder) to
/// untrusted input
///
/// # Usage Example
///
/// ```rust
/// use ads_asn1::grammar::{Asn1Decoder, DecoderConfig};
///
/// let decoder = Asn1Decoder::with_config(
///     DecoderConfig::new().with_max_pdu_size(64 * 1024).with_max_depth(8),
/// );
/// assert_eq!(decoder.config().max_pdu_size(), 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    max_pdu_size: usize,
    max_depth: usize,
}

impl DecoderConfig {
    /// Configuration with the default limits
    pub fn new() -> Self {
        Self {
            max_pdu_size: DEFAULT_MAX_PDU_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the largest accepted PDU, tag and length octets included
    pub fn with_max_pdu_size(mut self, max_pdu_size: usize) -> Self {
        self.max_pdu_size = max_pdu_size;
        self
    }

    /// Set the deepest accepted nesting of constructed values
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Largest accepted PDU
    pub fn max_pdu_size(&self) -> usize {
        self.max_pdu_size
    }

    /// Deepest accepted nesting
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
