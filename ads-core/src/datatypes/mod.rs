//! ASN.1 value types shared by the codec crates

pub mod bit_string;
pub mod generalized_time;

pub use bit_string::BitString;
pub use generalized_time::GeneralizedTime;
