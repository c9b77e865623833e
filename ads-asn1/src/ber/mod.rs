//! BER (Basic Encoding Rules) primitives for ASN.1
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 indicates extended tag
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127, bit 8 clear
//! - **Long form** (2-5 bytes): first byte `0x80 | n`, followed by `n`
//!   big-endian length octets (`1 <= n <= 4`, minimal `n`)
//!
//! Indefinite length (`0x80`) is not supported.
//!
//! ## Integer Values
//!
//! INTEGER values are minimal two's-complement big-endian: `128` is
//! `00 80`, `-128` is `80`.

pub mod encoder;
pub mod length;
pub mod types;
pub mod value;

pub use encoder::BerEncoder;
pub use length::{BerLength, decode_length, encode_length, encode_length_into, length_byte_count};
pub use types::{BerTag, BerTagClass};
