//! ads - BER/DER codec with grammar-driven decoding
//!
//! This library decodes untrusted, incrementally delivered BER input into
//! typed structures and encodes those structures back to DER.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ads-core`: Error type and shared value types (BitString, GeneralizedTime)
//! - `ads-asn1`: TLV length/integer codecs, BER encoder and the grammar engine
//! - `ads-kerberos`: Kerberos structures and their grammars
//!
//! # Implementation Status
//!
//! ## ✅ 已完成
//! - TLV 长度/整数编解码（短格式、长格式、最小补码）
//! - 语法引擎（状态表、长度栈、可恢复解码）
//! - Kerberos 结构
//!   - ✅ EncKdcRepPart / EncAsRepPart / EncTgsRepPart
//!   - ✅ EncryptionKey, LastReq, PrincipalName, HostAddresses
//!
//! ## 📋 待实现
//! - KDC-REP 外层结构（Ticket、EncryptedData）
//!
//! # Usage
//!
//! ```rust
//! use ads::kerberos::{EncryptionKey, EncryptionType};
//! use ads::{Asn1Decoder, BerEncoder};
//!
//! let key = EncryptionKey::new(EncryptionType::Aes256CtsHmacSha196, vec![0; 32]);
//! let bytes = key.encode().unwrap();
//! assert_eq!(EncryptionKey::decode(&bytes).unwrap(), key);
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_i32(-128).unwrap();
//! assert_eq!(encoder.as_bytes(), &[0x02, 0x01, 0x80]);
//! let _decoder = Asn1Decoder::new();
//! ```

// Re-export core types
pub use ads_core::datatypes::*;
pub use ads_core::{CodecError, CodecResult};

// Re-export the codec and grammar engine
pub use ads_asn1::{
    Asn1Decoder, BerEncoder, BerTag, BerTagClass, Container, DecodeStatus, DecoderConfig, Grammar,
    States, Transition, ValueMode,
};

pub mod ber {
    pub use ads_asn1::ber::*;
}

pub mod grammar {
    pub use ads_asn1::grammar::*;
}

// Re-export Kerberos structures
pub mod kerberos {
    pub use ads_kerberos::*;
}
