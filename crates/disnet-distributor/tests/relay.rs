// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end relay tests over localhost sockets.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use disnet::protocol::pdu::EntityStatePdu;
use disnet::protocol::{decode_bundle, decode_pdu, encode_pdu, Pdu, PduBody};

use disnet_distributor::{DisLinkConfig, Distributor, DistributorConfig, LinkConfig, WanLinkConfig};

/// A bound socket standing in for a remote federate.
fn federate() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("federate socket");
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("timeout");
    let addr = socket.local_addr().expect("addr");
    (socket, addr)
}

/// Grab a currently-free UDP port for a link to bind.
fn free_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("port pick");
    socket.local_addr().expect("addr").port()
}

fn entity_state_wire() -> Vec<u8> {
    let mut body = EntityStatePdu::default();
    body.capabilities = 7;
    let mut pdu = Pdu::new(PduBody::EntityState(body), 1);
    pdu.header.timestamp = 42;
    encode_pdu(&pdu).expect("encode")
}

#[test]
fn test_relay_between_dis_links_with_anti_echo() {
    let (fed_a, dest_a) = federate();
    let (fed_b, dest_b) = federate();
    let port_a = free_port();
    let port_b = free_port();

    let mut config = DistributorConfig::default();
    config.add_link(LinkConfig::Dis(DisLinkConfig::new("a", port_a, dest_a.to_string())));
    config.add_link(LinkConfig::Dis(DisLinkConfig::new("b", port_b, dest_b.to_string())));

    let mut distributor = Distributor::new(config).expect("distributor");
    assert_eq!(distributor.up_all(), 2);

    let wire = entity_state_wire();
    let injector = UdpSocket::bind("127.0.0.1:0").expect("injector");
    injector
        .send_to(&wire, ("127.0.0.1", port_a))
        .expect("inject into link a");

    // The PDU arrives at link B's destination...
    let mut buf = [0u8; 2048];
    let (len, _) = fed_b.recv_from(&mut buf).expect("relayed to b");
    assert_eq!(&buf[..len], wire.as_slice());
    let relayed = decode_pdu(&buf[..len]).expect("decode relayed");
    assert_eq!(relayed.header.timestamp, 42);

    // ...and never back out link A (anti-echo).
    fed_a
        .set_read_timeout(Some(Duration::from_millis(300)))
        .expect("timeout");
    assert!(fed_a.recv_from(&mut buf).is_err());

    let stats = distributor.stats();
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.deliveries, 1);

    distributor.shutdown();
}

#[test]
fn test_relay_from_dis_link_to_wan_peer_is_bundled() {
    let (_fed_lan, dest_lan) = federate();
    let (wan_peer, peer_addr) = federate();
    let lan_port = free_port();
    let wan_port = free_port();

    let mut config = DistributorConfig::default();
    config.add_link(LinkConfig::Dis(DisLinkConfig::new("lan", lan_port, dest_lan.to_string())));
    config.add_link(LinkConfig::Wan(
        WanLinkConfig::new("wan", wan_port, peer_addr.to_string()).bundle(1400, 50),
    ));

    let mut distributor = Distributor::new(config).expect("distributor");
    assert_eq!(distributor.up_all(), 2);

    let wire = entity_state_wire();
    let injector = UdpSocket::bind("127.0.0.1:0").expect("injector");
    injector.send_to(&wire, ("127.0.0.1", lan_port)).expect("inject");
    injector.send_to(&wire, ("127.0.0.1", lan_port)).expect("inject");

    let mut buf = [0u8; 4096];
    let mut pdus = Vec::new();
    while pdus.len() < 2 {
        let (len, _) = wan_peer.recv_from(&mut buf).expect("wan bundle");
        pdus.extend(decode_bundle(&buf[..len]).expect("decode bundle"));
    }
    assert_eq!(pdus.len(), 2);
    for pdu in &pdus {
        assert_eq!(pdu.header.timestamp, 42);
        assert!(matches!(pdu.body, PduBody::EntityState(_)));
    }

    distributor.shutdown();
}

#[test]
fn test_exercise_filter_at_the_link_boundary() {
    let (_fed_a, dest_a) = federate();
    let (fed_b, dest_b) = federate();
    let port_a = free_port();
    let port_b = free_port();

    let mut config = DistributorConfig::default();
    config.add_link(LinkConfig::Dis(
        DisLinkConfig::new("a", port_a, dest_a.to_string()).exercise(5),
    ));
    config.add_link(LinkConfig::Dis(DisLinkConfig::new("b", port_b, dest_b.to_string())));

    let mut distributor = Distributor::new(config).expect("distributor");
    assert_eq!(distributor.up_all(), 2);

    let matching = {
        let mut pdu = Pdu::new(PduBody::EntityState(EntityStatePdu::default()), 5);
        pdu.header.timestamp = 1;
        encode_pdu(&pdu).expect("encode")
    };
    let mismatched = {
        let mut pdu = Pdu::new(PduBody::EntityState(EntityStatePdu::default()), 9);
        pdu.header.timestamp = 2;
        encode_pdu(&pdu).expect("encode")
    };

    let injector = UdpSocket::bind("127.0.0.1:0").expect("injector");
    injector.send_to(&mismatched, ("127.0.0.1", port_a)).expect("inject");
    injector.send_to(&matching, ("127.0.0.1", port_a)).expect("inject");

    // Only the matching-exercise PDU crosses the relay.
    let mut buf = [0u8; 2048];
    let (len, _) = fed_b.recv_from(&mut buf).expect("relayed");
    let relayed = decode_pdu(&buf[..len]).expect("decode");
    assert_eq!(relayed.header.exercise_id, 5);
    assert_eq!(relayed.header.timestamp, 1);

    fed_b
        .set_read_timeout(Some(Duration::from_millis(300)))
        .expect("timeout");
    assert!(fed_b.recv_from(&mut buf).is_err());

    distributor.shutdown();
}
