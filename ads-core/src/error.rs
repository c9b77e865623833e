use thiserror::Error;

/// Main error type for BER encoding and grammar-driven decoding
///
/// Every variant is terminal for the decode call that produced it. Variants
/// raised by the decoder loop carry the byte offset (counted from the first
/// byte of the PDU) so callers can diagnose without re-parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Length octets are invalid: indefinite form, more than four octets,
    /// or the buffer ended in the middle of them.
    #[error("Malformed length at offset {offset}: {reason}")]
    MalformedLength { offset: usize, reason: String },

    /// No transition exists for `tag` in `state` of `grammar`.
    #[error("Unexpected tag 0x{tag:02X} in state {state} of grammar {grammar} at offset {offset}")]
    UnexpectedTag {
        grammar: &'static str,
        state: &'static str,
        tag: u8,
        offset: usize,
    },

    /// Integer value octets are empty or wider than the target integer.
    #[error("Integer overflow: {length} value bytes")]
    IntegerOverflow { length: usize },

    /// The PDU ended before the terminal state, or a nested length does not
    /// fit its enclosing length.
    #[error("Truncated or malformed structure at offset {offset}: {reason}")]
    TruncatedOrMalformedStructure { offset: usize, reason: String },

    /// A well-formed TLV carries a value the structure does not accept.
    #[error("Invalid value for {field}: {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    /// A declared length is above the configured PDU limit.
    #[error("PDU too large: {length} bytes (max {max})")]
    PduTooLarge { length: usize, max: usize },
}

impl CodecError {
    /// Shorthand for [`CodecError::InvalidFieldValue`]
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::InvalidFieldValue {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CodecError::TruncatedOrMalformedStructure`]
    pub fn truncated(offset: usize, reason: impl Into<String>) -> Self {
        CodecError::TruncatedOrMalformedStructure {
            offset,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CodecError::MalformedLength`]
    pub fn malformed_length(offset: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedLength {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
