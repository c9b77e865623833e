//! Grammars for the Kerberos structures
//!
//! One static table per structure. Explicitly tagged fields that hold a
//! whole sub-structure are buffered and handed to the sub-structure's own
//! grammar; everything else is decoded in place.

pub mod enc_kdc_rep_part;
pub mod encryption_key;
pub mod host_addresses;
pub mod last_req;
pub mod principal_name;

pub use enc_kdc_rep_part::{
    EncAsRepPartContainer, EncKdcRepPartContainer, EncKdcRepPartStates, EncRepPartStates,
    EncTgsRepPartContainer, ENC_AS_REP_PART_GRAMMAR, ENC_KDC_REP_PART_GRAMMAR,
    ENC_TGS_REP_PART_GRAMMAR,
};
pub use encryption_key::{EncryptionKeyContainer, EncryptionKeyStates, ENCRYPTION_KEY_GRAMMAR};
pub use host_addresses::{
    HostAddressContainer, HostAddressStates, HostAddressesContainer, HostAddressesStates,
    HOST_ADDRESSES_GRAMMAR, HOST_ADDRESS_GRAMMAR,
};
pub use last_req::{LastReqContainer, LastReqStates, LAST_REQ_GRAMMAR};
pub use principal_name::{PrincipalNameContainer, PrincipalNameStates, PRINCIPAL_NAME_GRAMMAR};
