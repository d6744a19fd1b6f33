// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # disnet - Distributed Interactive Simulation networking
//!
//! A pure Rust implementation of the IEEE 1278.1 DIS wire protocol: a binary
//! PDU codec plus a UDP transport for exchanging simulation state between
//! federates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use disnet::protocol::{encode_pdu, Pdu, PduBody};
//! use disnet::protocol::pdu::EntityStatePdu;
//! use disnet::transport::udp::UdpConnection;
//! use disnet::wire::WireResult;
//!
//! fn main() -> WireResult<()> {
//!     let state = EntityStatePdu::default();
//!     let pdu = Pdu::new(PduBody::EntityState(state), 1);
//!     let datagram = encode_pdu(&pdu)?;
//!
//!     let connection = UdpConnection::new("site-net");
//!     // configure/open against an exercise network, then:
//!     // connection.send_bytes(&datagram)?;
//!     let _ = (connection, datagram);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                      Application Layer                       |
//! |        typed PDUs in, typed PDUs out, receive callbacks      |
//! +--------------------------------------------------------------+
//! |                        Protocol Layer                        |
//! |   PduHeader | typed bodies | factory dispatch | bundles      |
//! +--------------------------------------------------------------+
//! |                          Wire Layer                          |
//! |   big-endian cursors | bounds checks | ASCII string rules    |
//! +--------------------------------------------------------------+
//! |                       Transport Layer                        |
//! |   UDP broadcast/multicast/unicast | receive thread | metrics |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`protocol::Pdu`] | A decoded PDU: header, typed or raw body, receive time |
//! | [`protocol::PduBody`] | The typed body sum, with `Unparsed` passthrough |
//! | [`transport::udp::UdpConnection`] | One UDP endpoint with its receive thread |
//! | [`transport::BytesReceiver`] | Callback handed each inbound datagram |
//! | [`wire::WireError`] | Every way a codec or transport call can fail |
//!
//! Unknown PDU kinds are never dropped by the codec: they decode to
//! [`protocol::PduBody::Unparsed`] and re-encode byte-for-byte, so relays
//! forward traffic they do not model.

pub mod config;
pub mod protocol;
pub mod transport;
pub mod wire;

pub use protocol::{decode_bundle, decode_pdu, encode_pdu, Pdu, PduBody, PduHeader, PduType};
pub use wire::{WireError, WireResult};
