//! Core types and utilities for the ads BER codec
//!
//! This crate provides the error taxonomy shared by every codec crate and the
//! ASN.1 value types (BIT STRING, GeneralizedTime) that are not tied to a
//! single protocol.

pub mod error;
pub mod datatypes;

pub use error::{CodecError, CodecResult};
pub use datatypes::{BitString, GeneralizedTime};
