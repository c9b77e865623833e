//! Kerberos data types (RFC 4120 section 5)

pub mod enc_kdc_rep_part;
pub mod encryption_key;
pub mod host_address;
pub mod last_req;
pub mod principal_name;
pub mod ticket_flags;

pub use enc_kdc_rep_part::{EncAsRepPart, EncKdcRepPart, EncTgsRepPart};
pub use encryption_key::{EncryptionKey, EncryptionType};
pub use host_address::{HostAddrType, HostAddress, HostAddresses};
pub use last_req::{LastReq, LastReqEntry, LastReqType};
pub use principal_name::{PrincipalName, PrincipalNameType};
pub use ticket_flags::{TicketFlag, TicketFlags};

/// `KerberosTime ::= GeneralizedTime -- with no fractional seconds`
pub type KerberosTime = ads_core::GeneralizedTime;
