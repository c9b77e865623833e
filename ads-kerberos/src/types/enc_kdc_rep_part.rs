//! EncKDCRepPart and its application-tagged forms
//!
//! ```text
//! EncKDCRepPart ::= SEQUENCE {
//!     key             [0] EncryptionKey,
//!     last-req        [1] LastReq,
//!     nonce           [2] UInt32,
//!     key-expiration  [3] KerberosTime OPTIONAL,
//!     flags           [4] TicketFlags,
//!     authtime        [5] KerberosTime,
//!     starttime       [6] KerberosTime OPTIONAL,
//!     endtime         [7] KerberosTime,
//!     renew-till      [8] KerberosTime OPTIONAL,
//!     srealm          [9] Realm,
//!     sname           [10] PrincipalName,
//!     caddr           [11] HostAddresses OPTIONAL
//! }
//!
//! EncASRepPart  ::= [APPLICATION 25] EncKDCRepPart
//! EncTGSRepPart ::= [APPLICATION 26] EncKDCRepPart
//! ```

use crate::grammar::enc_kdc_rep_part::{
    ENC_AS_REP_PART_GRAMMAR, ENC_KDC_REP_PART_GRAMMAR, ENC_TGS_REP_PART_GRAMMAR,
};
use crate::types::{EncryptionKey, HostAddresses, KerberosTime, LastReq, PrincipalName, TicketFlags};
use ads_asn1::{Asn1Decoder, BerEncoder};
use ads_core::CodecResult;
use serde::{Deserialize, Serialize};

/// Application tag number of EncASRepPart
pub const ENC_AS_REP_PART_TAG: u32 = 25;

/// Application tag number of EncTGSRepPart
pub const ENC_TGS_REP_PART_TAG: u32 = 26;

/// Encrypted part of an AS-REP or TGS-REP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncKdcRepPart {
    pub key: EncryptionKey,
    pub last_req: LastReq,
    pub nonce: u32,
    pub key_expiration: Option<KerberosTime>,
    pub flags: TicketFlags,
    pub auth_time: KerberosTime,
    pub start_time: Option<KerberosTime>,
    pub end_time: KerberosTime,
    pub renew_till: Option<KerberosTime>,
    pub srealm: String,
    pub sname: PrincipalName,
    pub caddr: Option<HostAddresses>,
}

impl EncKdcRepPart {
    /// Encode as DER
    ///
    /// Fields are written in tag order and absent optional fields are
    /// omitted, so equal values always give identical bytes.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut fields = BerEncoder::new();
        fields.encode_explicit(0, |e| {
            e.append_raw(&self.key.encode()?);
            Ok(())
        })?;
        fields.encode_explicit(1, |e| {
            e.append_raw(&self.last_req.encode()?);
            Ok(())
        })?;
        fields.encode_explicit(2, |e| e.encode_i64(self.nonce as i64))?;
        if let Some(key_expiration) = &self.key_expiration {
            fields.encode_explicit(3, |e| e.encode_generalized_time(key_expiration))?;
        }
        fields.encode_explicit(4, |e| e.encode_bit_string(&self.flags.to_bit_string()))?;
        fields.encode_explicit(5, |e| e.encode_generalized_time(&self.auth_time))?;
        if let Some(start_time) = &self.start_time {
            fields.encode_explicit(6, |e| e.encode_generalized_time(start_time))?;
        }
        fields.encode_explicit(7, |e| e.encode_generalized_time(&self.end_time))?;
        if let Some(renew_till) = &self.renew_till {
            fields.encode_explicit(8, |e| e.encode_generalized_time(renew_till))?;
        }
        fields.encode_explicit(9, |e| e.encode_general_string(&self.srealm))?;
        fields.encode_explicit(10, |e| {
            e.append_raw(&self.sname.encode()?);
            Ok(())
        })?;
        if let Some(caddr) = &self.caddr {
            fields.encode_explicit(11, |e| {
                e.append_raw(&caddr.encode()?);
                Ok(())
            })?;
        }

        let mut encoder = BerEncoder::with_capacity(fields.len() + 6);
        encoder.encode_sequence(fields.as_bytes())?;
        Ok(encoder.into_bytes())
    }

    /// Decode one complete EncKDCRepPart
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &ENC_KDC_REP_PART_GRAMMAR)
    }

    fn encode_application(&self, tag_number: u32) -> CodecResult<Vec<u8>> {
        let inner = self.encode()?;
        let mut encoder = BerEncoder::with_capacity(inner.len() + 6);
        encoder.encode_application(tag_number, &inner, true)?;
        Ok(encoder.into_bytes())
    }
}

/// `[APPLICATION 25]` EncKDCRepPart, found in an AS-REP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncAsRepPart(pub EncKdcRepPart);

impl EncAsRepPart {
    /// The wrapped EncKDCRepPart
    pub fn into_inner(self) -> EncKdcRepPart {
        self.0
    }

    /// Encode as DER under `[APPLICATION 25]`
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        self.0.encode_application(ENC_AS_REP_PART_TAG)
    }

    /// Decode one complete `[APPLICATION 25]` EncKDCRepPart
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &ENC_AS_REP_PART_GRAMMAR)
    }
}

impl From<EncKdcRepPart> for EncAsRepPart {
    fn from(part: EncKdcRepPart) -> Self {
        Self(part)
    }
}

/// `[APPLICATION 26]` EncKDCRepPart, found in a TGS-REP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncTgsRepPart(pub EncKdcRepPart);

impl EncTgsRepPart {
    /// The wrapped EncKDCRepPart
    pub fn into_inner(self) -> EncKdcRepPart {
        self.0
    }

    /// Encode as DER under `[APPLICATION 26]`
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        self.0.encode_application(ENC_TGS_REP_PART_TAG)
    }

    /// Decode one complete `[APPLICATION 26]` EncKDCRepPart
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Asn1Decoder::new().decode_pdu(bytes, &ENC_TGS_REP_PART_GRAMMAR)
    }
}

impl From<EncKdcRepPart> for EncTgsRepPart {
    fn from(part: EncKdcRepPart) -> Self {
        Self(part)
    }
}
