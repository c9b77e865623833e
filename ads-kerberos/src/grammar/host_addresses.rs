//! HostAddress and HostAddresses grammars

use crate::types::{HostAddrType, HostAddress, HostAddresses};
use ads_asn1::ber::types::{context_tag, INTEGER_TAG, OCTET_STRING_TAG, SEQUENCE_TAG};
use ads_asn1::ber::value::decode_i32;
use ads_asn1::grammar::actions::check_not_null_length;
use ads_asn1::{Container, Grammar, Transition, ValueMode};
use ads_core::{CodecError, CodecResult};
use once_cell::sync::Lazy;

ads_asn1::states! {
    /// States of the HostAddress grammar
    pub enum HostAddressStates {
        Start,
        Sequence,
        AddrTypeTag,
        AddrType,
        AddressTag,
        Address,
        Last,
    }
    start = Start;
    end = Last;
}

ads_asn1::states! {
    /// States of the HostAddresses grammar
    pub enum HostAddressesStates {
        Start,
        Sequence,
        Entry,
        AddrTypeTag,
        AddrType,
        AddressTag,
        Address,
        Last,
    }
    start = Start;
    end = Last;
}

pub type HostAddressContainer = Container<HostAddressStates, HostAddress>;

pub type HostAddressesContainer = Container<HostAddressesStates, HostAddresses>;

fn init_host_address(container: &mut HostAddressContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = HostAddress::default();
    Ok(())
}

fn store_addr_type(container: &mut HostAddressContainer) -> CodecResult<()> {
    let addr_type = decode_i32(container.current_tlv().value())?;
    container.target_mut().addr_type = HostAddrType::from(addr_type);
    Ok(())
}

fn store_address(container: &mut HostAddressContainer) -> CodecResult<()> {
    let address = container.current_tlv().value().to_vec();
    container.target_mut().address = address;
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static HOST_ADDRESS_GRAMMAR: Lazy<Grammar<HostAddressStates, HostAddress>> = Lazy::new(|| {
    use HostAddressStates::*;
    let mut grammar = Grammar::new("HostAddress");
    grammar
        .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
            .with_action("init HostAddress", init_host_address))
        .add(Transition::new(Sequence, AddrTypeTag, context_tag(0), ValueMode::Descend)
            .with_action("check addr-type", check_not_null_length))
        .add(Transition::new(AddrTypeTag, AddrType, INTEGER_TAG, ValueMode::Value)
            .with_action("store addr-type", store_addr_type))
        .add(Transition::new(AddrType, AddressTag, context_tag(1), ValueMode::Descend)
            .with_action("check address", check_not_null_length))
        .add(Transition::new(AddressTag, Address, OCTET_STRING_TAG, ValueMode::Value)
            .with_action("store address", store_address));
    grammar
});

fn current_address(container: &mut HostAddressesContainer) -> CodecResult<&mut HostAddress> {
    container
        .target_mut()
        .0
        .last_mut()
        .ok_or_else(|| CodecError::invalid_field("caddr", "no address started"))
}

fn init_host_addresses(container: &mut HostAddressesContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    *container.target_mut() = HostAddresses::default();
    Ok(())
}

fn start_host_address(container: &mut HostAddressesContainer) -> CodecResult<()> {
    check_not_null_length(container)?;
    container.target_mut().0.push(HostAddress::default());
    container.set_grammar_end_allowed(false);
    Ok(())
}

fn store_list_addr_type(container: &mut HostAddressesContainer) -> CodecResult<()> {
    let addr_type = decode_i32(container.current_tlv().value())?;
    current_address(container)?.addr_type = HostAddrType::from(addr_type);
    Ok(())
}

fn store_list_address(container: &mut HostAddressesContainer) -> CodecResult<()> {
    let address = container.current_tlv().value().to_vec();
    current_address(container)?.address = address;
    container.set_grammar_end_allowed(true);
    Ok(())
}

pub static HOST_ADDRESSES_GRAMMAR: Lazy<Grammar<HostAddressesStates, HostAddresses>> =
    Lazy::new(|| {
        use HostAddressesStates::*;
        let mut grammar = Grammar::new("HostAddresses");
        grammar
            .add(Transition::new(Start, Sequence, SEQUENCE_TAG, ValueMode::Descend)
                .with_action("init HostAddresses", init_host_addresses))
            .add(Transition::new(Sequence, Entry, SEQUENCE_TAG, ValueMode::Descend)
                .closing_in(&[Address])
                .with_action("start HostAddress", start_host_address))
            .add(Transition::new(Entry, AddrTypeTag, context_tag(0), ValueMode::Descend)
                .with_action("check addr-type", check_not_null_length))
            .add(Transition::new(AddrTypeTag, AddrType, INTEGER_TAG, ValueMode::Value)
                .with_action("store addr-type", store_list_addr_type))
            .add(Transition::new(AddrType, AddressTag, context_tag(1), ValueMode::Descend)
                .with_action("check address", check_not_null_length))
            .add(Transition::new(AddressTag, Address, OCTET_STRING_TAG, ValueMode::Value)
                .with_action("store address", store_list_address))
            .add(Transition::new(Address, Entry, SEQUENCE_TAG, ValueMode::Descend)
                .closing_in(&[Address])
                .with_action("start HostAddress", start_host_address));
        grammar
    });

#[cfg(test)]
mod tests {
    use super::*;
    use ads_asn1::Asn1Decoder;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_decode_single_address() {
        let address = HostAddress::ipv6(Ipv6Addr::LOCALHOST);
        let bytes = address.encode().unwrap();
        let decoded = Asn1Decoder::new()
            .decode_pdu(&bytes, &HOST_ADDRESS_GRAMMAR)
            .unwrap();
        assert_eq!(decoded, address);
        assert_eq!(decoded.address.len(), 16);
    }

    #[test]
    fn test_decode_address_list() {
        let addresses = HostAddresses::new(vec![
            HostAddress::ipv4(Ipv4Addr::new(192, 168, 1, 10)),
            HostAddress::new(HostAddrType::NetBios, b"WORKSTATION1    ".to_vec()),
            HostAddress::new(HostAddrType::Other(-1), Vec::new()),
        ]);
        let bytes = addresses.encode().unwrap();
        let decoded = Asn1Decoder::new()
            .decode_pdu(&bytes, &HOST_ADDRESSES_GRAMMAR)
            .unwrap();
        assert_eq!(decoded, addresses);
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            HostAddresses::decode(&[0x30, 0x00]),
            Err(CodecError::InvalidFieldValue { field: "HostAddresses", .. })
        ));
    }

    #[test]
    fn test_list_is_not_an_address() {
        let bytes = HostAddresses::new(vec![HostAddress::ipv4(Ipv4Addr::LOCALHOST)])
            .encode()
            .unwrap();
        assert_eq!(
            HostAddress::decode(&bytes),
            Err(CodecError::UnexpectedTag {
                grammar: "HostAddress",
                state: "Sequence",
                tag: 0x30,
                offset: 2,
            })
        );
    }

    #[test]
    fn test_address_outside_entry_rejected() {
        // The entry SEQUENCE ends after addr-type; address follows it
        let bytes = [
            0x30, 0x0F, 0x30, 0x05, 0xA0, 0x03, 0x02, 0x01, 0x02, 0xA1, 0x06, 0x04, 0x04, 0x0A,
            0x00, 0x00, 0x01,
        ];
        assert!(matches!(
            HostAddresses::decode(&bytes),
            Err(CodecError::TruncatedOrMalformedStructure { offset: 9, .. })
        ));
    }
}
