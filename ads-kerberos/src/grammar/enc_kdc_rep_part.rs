//! EncKDCRepPart grammar
//!
//! ```text
//! Start -0x30-> Sequence -[0]-> KeyTag -[1]-> LastReqTag -[2]-> NonceTag -INTEGER-> Nonce
//! Nonce ---------[3]-> KeyExpirationTag -GeneralizedTime-> KeyExpiration
//! Nonce | KeyExpiration -[4]-> FlagsTag -BIT STRING-> Flags
//! Flags -[5]-> AuthTimeTag -> AuthTime
//! AuthTime ------[6]-> StartTimeTag -> StartTime
//! AuthTime | StartTime -[7]-> EndTimeTag -> EndTime
//! EndTime -------[8]-> RenewTillTag -> RenewTill
//! EndTime | RenewTill -[9]-> SrealmTag -GeneralString-> Srealm
//! Srealm -[10]-> SnameTag (may end) -[11]-> CaddrTag (may end)
//! ```
//!
//! `key`, `last-req`, `sname` and `caddr` are buffered whole and decoded by
//! their own grammars.

use crate::grammar::encryption_key::ENCRYPTION_KEY_GRAMMAR;
use crate::grammar::host_addresses::HOST_ADDRESSES_GRAMMAR;
use crate::grammar::last_req::LAST_REQ_GRAMMAR;
use crate::grammar::principal_name::PRINCIPAL_NAME_GRAMMAR;
use crate::types::{EncAsRepPart, EncKdcRepPart, EncTgsRepPart, TicketFlags};
use ads_asn1::ber::types::{
    application_tag, context_tag, BIT_STRING_TAG, GENERALIZED_TIME_TAG, GENERAL_STRING_TAG,
    INTEGER_TAG, SEQUENCE_TAG,
};
use ads_asn1::ber::value::{
    decode_bit_string, decode_general_string, decode_generalized_time, decode_u32,
};
use ads_asn1::grammar::actions::{check_not_null_length, decode_nested};
use ads_asn1::{Container, Grammar, Transition, ValueMode};
use ads_core::{CodecResult, GeneralizedTime};
use once_cell::sync::Lazy;

ads_asn1::states! {
    /// States of the EncKDCRepPart grammar
    pub enum EncKdcRepPartStates {
        Start,
        Sequence,
        KeyTag,
        LastReqTag,
        NonceTag,
        Nonce,
        KeyExpirationTag,
        KeyExpiration,
        FlagsTag,
        Flags,
        AuthTimeTag,
        AuthTime,
        StartTimeTag,
        StartTime,
        EndTimeTag,
        EndTime,
        RenewTillTag,
        RenewTill,
        SrealmTag,
        Srealm,
        SnameTag,
        CaddrTag,
        Last,
    }
    start = Start;
    end = Last;
}

ads_asn1::states! {
    /// States shared by the EncASRepPart and EncTGSRepPart grammars
    pub enum EncRepPartStates {
        Start,
        EncPart,
        Last,
    }
    start = Start;
    end = Last;
}

pub type EncKdcRepPartContainer = Container<EncKdcRepPartStates, EncKdcRepPart>;

pub type EncAsRepPartContainer = Container<EncRepPartStates, EncAsRepPart>;

pub type EncTgsRepPartContainer = Container<EncRepPartStates, EncTgsRepPart>;

fn init_enc_kdc_rep_part(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = EncKdcRepPart::default();
    Ok(())
}

fn store_key(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let key = decode_nested(container, &ENCRYPTION_KEY_GRAMMAR)?;
    container.target_mut().key = key;
    Ok(())
}

fn store_last_req(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let last_req = decode_nested(container, &LAST_REQ_GRAMMAR)?;
    container.target_mut().last_req = last_req;
    Ok(())
}

fn store_nonce(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let nonce = decode_u32("nonce", container.current_tlv().value())?;
    container.target_mut().nonce = nonce;
    Ok(())
}

fn time_value(container: &EncKdcRepPartContainer) -> CodecResult<GeneralizedTime> {
    decode_generalized_time(container.current_tlv().value())
}

fn store_key_expiration(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let key_expiration = time_value(container)?;
    container.target_mut().key_expiration = Some(key_expiration);
    Ok(())
}

fn store_flags(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let bit_string = decode_bit_string(container.current_tlv().value())?;
    container.target_mut().flags = TicketFlags::from_bit_string(&bit_string)?;
    Ok(())
}

fn store_auth_time(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let auth_time = time_value(container)?;
    container.target_mut().auth_time = auth_time;
    Ok(())
}

fn store_start_time(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let start_time = time_value(container)?;
    container.target_mut().start_time = Some(start_time);
    Ok(())
}

fn store_end_time(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let end_time = time_value(container)?;
    container.target_mut().end_time = end_time;
    Ok(())
}

fn store_renew_till(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let renew_till = time_value(container)?;
    container.target_mut().renew_till = Some(renew_till);
    Ok(())
}

fn store_srealm(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    let srealm = decode_general_string("srealm", container.current_tlv().value())?;
    container.target_mut().srealm = srealm;
    Ok(())
}

fn store_sname(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let sname = decode_nested(container, &PRINCIPAL_NAME_GRAMMAR)?;
    container.target_mut().sname = sname;
    // caddr is optional and the last field
    container.set_grammar_end_allowed(true);
    Ok(())
}

fn store_caddr(container: &mut EncKdcRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let caddr = decode_nested(container, &HOST_ADDRESSES_GRAMMAR)?;
    container.target_mut().caddr = Some(caddr);
    Ok(())
}

pub static ENC_KDC_REP_PART_GRAMMAR: Lazy<Grammar<EncKdcRepPartStates, EncKdcRepPart>> =
    Lazy::new(|| {
        use EncKdcRepPartStates::*;
        let mut grammar = Grammar::new("EncKdcRepPart");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init EncKdcRepPart", init_enc_kdc_rep_part))
            .add(Transition::new(Sequence, KeyTag, context_tag(0), ValueMode::Value)
                .with_action("store key", store_key))
            .add(Transition::new(KeyTag, LastReqTag, context_tag(1), ValueMode::Value)
                .with_action("store last-req", store_last_req))
            .add(Transition::new(LastReqTag, NonceTag, context_tag(2), ValueMode::Descend)
                .with_action("check nonce", check_not_null_length))
            .add(Transition::new(NonceTag, Nonce, INTEGER_TAG, ValueMode::Value)
                .with_action("store nonce", store_nonce))
            // key-expiration is optional
            .add(Transition::new(Nonce, KeyExpirationTag, context_tag(3), ValueMode::Descend)
                .with_action("check key-expiration", check_not_null_length))
            .add(Transition::new(KeyExpirationTag, KeyExpiration, GENERALIZED_TIME_TAG, ValueMode::Value)
                .with_action("store key-expiration", store_key_expiration))
            .add(Transition::new(Nonce, FlagsTag, context_tag(4), ValueMode::Descend)
                .with_action("check flags", check_not_null_length))
            .add(Transition::new(KeyExpiration, FlagsTag, context_tag(4), ValueMode::Descend)
                .with_action("check flags", check_not_null_length))
            .add(Transition::new(FlagsTag, Flags, BIT_STRING_TAG, ValueMode::Value)
                .with_action("store flags", store_flags))
            .add(Transition::new(Flags, AuthTimeTag, context_tag(5), ValueMode::Descend)
                .with_action("check authtime", check_not_null_length))
            .add(Transition::new(AuthTimeTag, AuthTime, GENERALIZED_TIME_TAG, ValueMode::Value)
                .with_action("store authtime", store_auth_time))
            // starttime is optional
            .add(Transition::new(AuthTime, StartTimeTag, context_tag(6), ValueMode::Descend)
                .with_action("check starttime", check_not_null_length))
            .add(Transition::new(StartTimeTag, StartTime, GENERALIZED_TIME_TAG, ValueMode::Value)
                .with_action("store starttime", store_start_time))
            .add(Transition::new(AuthTime, EndTimeTag, context_tag(7), ValueMode::Descend)
                .with_action("check endtime", check_not_null_length))
            .add(Transition::new(StartTime, EndTimeTag, context_tag(7), ValueMode::Descend)
                .with_action("check endtime", check_not_null_length))
            .add(Transition::new(EndTimeTag, EndTime, GENERALIZED_TIME_TAG, ValueMode::Value)
                .with_action("store endtime", store_end_time))
            // renew-till is optional
            .add(Transition::new(EndTime, RenewTillTag, context_tag(8), ValueMode::Descend)
                .with_action("check renew-till", check_not_null_length))
            .add(Transition::new(RenewTillTag, RenewTill, GENERALIZED_TIME_TAG, ValueMode::Value)
                .with_action("store renew-till", store_renew_till))
            .add(Transition::new(EndTime, SrealmTag, context_tag(9), ValueMode::Descend)
                .with_action("check srealm", check_not_null_length))
            .add(Transition::new(RenewTill, SrealmTag, context_tag(9), ValueMode::Descend)
                .with_action("check srealm", check_not_null_length))
            .add(Transition::new(SrealmTag, Srealm, GENERAL_STRING_TAG, ValueMode::Value)
                .with_action("store srealm", store_srealm))
            .add(Transition::new(Srealm, SnameTag, context_tag(10), ValueMode::Value)
                .with_action("store sname", store_sname))
            .add(Transition::new(SnameTag, CaddrTag, context_tag(11), ValueMode::Value)
                .with_action("store caddr", store_caddr));
        grammar
    });

fn store_enc_as_rep_part(container: &mut EncAsRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let part = decode_nested(container, &ENC_KDC_REP_PART_GRAMMAR)?;
    *container.target_mut() = EncAsRepPart(part);
    container.set_grammar_end_allowed(true);
    Ok(())
}

fn store_enc_tgs_rep_part(container: &mut EncTgsRepPartContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    let part = decode_nested(container, &ENC_KDC_REP_PART_GRAMMAR)?;
    *container.target_mut() = EncTgsRepPart(part);
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static ENC_AS_REP_PART_GRAMMAR: Lazy<Grammar<EncRepPartStates, EncAsRepPart>> =
    Lazy::new(|| {
        let mut grammar = Grammar::new("EncAsRepPart");
        grammar.add(
            Transition::new(
                EncRepPartStates::Start,
                EncRepPartStates::EncPart,
                application_tag(25),
                ValueMode::Value,
            )
            .with_action("store EncKdcRepPart", store_enc_as_rep_part),
        );
        grammar
    });

pub static ENC_TGS_REP_PART_GRAMMAR: Lazy<Grammar<EncRepPartStates, EncTgsRepPart>> =
    Lazy::new(|| {
        let mut grammar = Grammar::new("EncTgsRepPart");
        grammar.add(
            Transition::new(
                EncRepPartStates::Start,
                EncRepPartStates::EncPart,
                application_tag(26),
                ValueMode::Value,
            )
            .with_action("store EncKdcRepPart", store_enc_tgs_rep_part),
        );
        grammar
    });

#[cfg(test)]
mod tests {
    use super::*;
    use ads_asn1::States;

    #[test]
    fn test_optional_fields_have_bypass_edges() {
        use EncKdcRepPartStates::*;
        let grammar = &*ENC_KDC_REP_PART_GRAMMAR;
        assert_eq!(grammar.expected_tags(Nonce), vec![0xA3, 0xA4]);
        assert_eq!(grammar.expected_tags(AuthTime), vec![0xA6, 0xA7]);
        assert_eq!(grammar.expected_tags(EndTime), vec![0xA8, 0xA9]);
        assert_eq!(grammar.expected_tags(SnameTag), vec![0xAB]);
        assert!(grammar.expected_tags(CaddrTag).is_empty());
        assert!(grammar.expected_tags(Last).is_empty());
    }

    #[test]
    fn test_sub_structures_are_buffered() {
        use EncKdcRepPartStates::*;
        let grammar = &*ENC_KDC_REP_PART_GRAMMAR;
        for (state, tag) in [(Sequence, 0xA0), (KeyTag, 0xA1), (Srealm, 0xAA), (SnameTag, 0xAB)] {
            let transition = grammar.transition(state, tag).unwrap();
            assert_eq!(transition.mode(), ValueMode::Value, "{}", state.name());
        }
        let nonce = grammar.transition(LastReqTag, 0xA2).unwrap();
        assert_eq!(nonce.mode(), ValueMode::Descend);
        assert_eq!(nonce.action().unwrap().name(), "check nonce");
    }

    #[test]
    fn test_state_table_shape() {
        assert_eq!(EncKdcRepPartStates::COUNT, 23);
        assert_eq!(EncKdcRepPartStates::START, EncKdcRepPartStates::Start);
        assert!(EncKdcRepPartStates::Last.is_end_state());
        assert_eq!(ENC_AS_REP_PART_GRAMMAR.expected_tags(EncRepPartStates::Start), vec![0x79]);
        assert_eq!(ENC_TGS_REP_PART_GRAMMAR.expected_tags(EncRepPartStates::Start), vec![0x7A]);
    }
}
