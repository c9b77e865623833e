//! ASN.1 processing for the ads codec
//!
//! This crate provides the BER Tag-Length-Value primitives and the
//! table-driven grammar engine that turns a stream of TLVs into a typed
//! structure.
//!
//! - [`ber`]: tag, length and integer value codecs plus [`BerEncoder`]
//! - [`grammar`]: [`Grammar`] tables, the per-decode [`Container`] and the
//!   resumable [`Asn1Decoder`] loop

pub mod ber;
pub mod grammar;

pub use ads_core::{CodecError, CodecResult};
pub use ber::{BerEncoder, BerTag, BerTagClass};
pub use grammar::{
    Action, Asn1Decoder, Container, DecodeStatus, DecoderConfig, Grammar, States, Transition,
    ValueMode,
};
