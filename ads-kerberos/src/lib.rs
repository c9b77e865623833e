//! Kerberos structures for the ads codec
//!
//! Every structure comes with a grammar (see [`grammar`]) that decodes it
//! with [`ads_asn1::Asn1Decoder`], and an `encode` method producing DER.
//!
//! # Usage Example
//!
//! ```rust
//! use ads_kerberos::{EncryptionKey, EncryptionType};
//!
//! let key = EncryptionKey::new(EncryptionType::Aes128CtsHmacSha196, vec![0x11; 16]);
//! let bytes = key.encode().unwrap();
//! assert_eq!(EncryptionKey::decode(&bytes).unwrap(), key);
//! ```

pub mod grammar;
pub mod types;

pub use types::{
    EncAsRepPart, EncKdcRepPart, EncTgsRepPart, EncryptionKey, EncryptionType, HostAddrType,
    HostAddress, HostAddresses, KerberosTime, LastReq, LastReqEntry, LastReqType, PrincipalName,
    PrincipalNameType, TicketFlag, TicketFlags,
};
