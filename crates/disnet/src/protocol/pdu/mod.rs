// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed PDU bodies and the decode/encode factory.
//!
//! [`decode_pdu`] turns a datagram into a [`Pdu`]: a header plus either a
//! typed body or, for kinds this codec does not model, the raw body bytes.
//! Unknown kinds are first-class citizens, not errors. They re-encode
//! byte-for-byte, so a relay built on this codec forwards traffic it does
//! not understand without corrupting it.

pub mod designator;
pub mod emission;
pub mod entity_state;
pub mod radio;
pub mod warfare;

pub use designator::DesignatorPdu;
pub use emission::EmissionPdu;
pub use entity_state::EntityStatePdu;
pub use radio::{ReceiverPdu, SignalPdu, TransmitterPdu};
pub use warfare::{DetonationPdu, FirePdu};

use std::time::SystemTime;

use crate::protocol::enums::{ProtocolFamily, ProtocolVersion};
use crate::protocol::header::{PduHeader, PduType};
use crate::wire::{Cursor, CursorMut, WireError, WireResult};

/// A decoded PDU body.
#[derive(Debug, Clone, PartialEq)]
pub enum PduBody {
    EntityState(EntityStatePdu),
    Fire(FirePdu),
    Detonation(DetonationPdu),
    ElectromagneticEmission(EmissionPdu),
    Designator(DesignatorPdu),
    Transmitter(TransmitterPdu),
    Signal(SignalPdu),
    Receiver(ReceiverPdu),
    /// Body bytes of a PDU kind this codec does not model, kept verbatim.
    Unparsed(Vec<u8>),
}

impl PduBody {
    /// Typed kind, `None` for unparsed bodies (the header still carries the
    /// raw type byte).
    pub fn pdu_type(&self) -> Option<PduType> {
        match self {
            PduBody::EntityState(_) => Some(PduType::EntityState),
            PduBody::Fire(_) => Some(PduType::Fire),
            PduBody::Detonation(_) => Some(PduType::Detonation),
            PduBody::ElectromagneticEmission(_) => Some(PduType::ElectromagneticEmission),
            PduBody::Designator(_) => Some(PduType::Designator),
            PduBody::Transmitter(_) => Some(PduType::Transmitter),
            PduBody::Signal(_) => Some(PduType::Signal),
            PduBody::Receiver(_) => Some(PduType::Receiver),
            PduBody::Unparsed(_) => None,
        }
    }

    /// Body length in bytes, recomputed from live state.
    pub fn content_length(&self) -> usize {
        match self {
            PduBody::EntityState(p) => p.content_length(),
            PduBody::Fire(p) => p.content_length(),
            PduBody::Detonation(p) => p.content_length(),
            PduBody::ElectromagneticEmission(p) => p.content_length(),
            PduBody::Designator(p) => p.content_length(),
            PduBody::Transmitter(p) => p.content_length(),
            PduBody::Signal(p) => p.content_length(),
            PduBody::Receiver(p) => p.content_length(),
            PduBody::Unparsed(bytes) => bytes.len(),
        }
    }

    fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        match self {
            PduBody::EntityState(p) => p.encode(cursor),
            PduBody::Fire(p) => p.encode(cursor),
            PduBody::Detonation(p) => p.encode(cursor),
            PduBody::ElectromagneticEmission(p) => p.encode(cursor),
            PduBody::Designator(p) => p.encode(cursor),
            PduBody::Transmitter(p) => p.encode(cursor),
            PduBody::Signal(p) => p.encode(cursor),
            PduBody::Receiver(p) => p.encode(cursor),
            PduBody::Unparsed(bytes) => cursor.write_bytes(bytes),
        }
    }
}

/// A complete PDU: header, body, and the local receive time when it came
/// off a socket (decode itself never stamps it).
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub header: PduHeader,
    pub body: PduBody,
    pub received: Option<SystemTime>,
}

impl Pdu {
    /// Build a PDU around a typed body with a header matching its kind.
    ///
    /// Unparsed bodies have no kind of their own, so the caller keeps the
    /// decoded header instead of using this constructor.
    pub fn new(body: PduBody, exercise_id: u8) -> Self {
        let header = match body.pdu_type() {
            Some(pdu_type) => PduHeader::new(pdu_type, exercise_id),
            None => PduHeader {
                protocol_version: ProtocolVersion::default(),
                exercise_id,
                pdu_type: 0,
                protocol_family: ProtocolFamily::Other(0),
                timestamp: 0,
                pdu_length: 0,
                pdu_status: 0,
                padding: 0,
            },
        };
        Self { header, body, received: None }
    }

    /// Total wire length: header plus live body length.
    pub fn wire_length(&self) -> usize {
        PduHeader::WIRE_LEN + self.body.content_length()
    }
}

/// Decode one PDU from a datagram.
///
/// The header's declared length is authoritative: bytes past it are padding
/// and are ignored. A declared length beyond the buffer is clamped to the
/// buffer, so truncated typed bodies fail with `EndOfData` rather than
/// reading garbage.
pub fn decode_pdu(buffer: &[u8]) -> WireResult<Pdu> {
    let mut cursor = Cursor::new(buffer);
    let header = PduHeader::decode(&mut cursor)?;

    let declared = header.pdu_length as usize;
    if declared < PduHeader::WIRE_LEN {
        return Err(WireError::MalformedHeader {
            reason: format!("declared length {} shorter than the header", declared),
        });
    }
    let body_end = declared.min(buffer.len());
    let body_bytes = &buffer[PduHeader::WIRE_LEN..body_end];

    let body = decode_body(&header, body_bytes)?;
    Ok(Pdu { header, body, received: None })
}

fn decode_body(header: &PduHeader, body_bytes: &[u8]) -> WireResult<PduBody> {
    let mut cursor = Cursor::new(body_bytes);
    Ok(match header.pdu_type() {
        Some(PduType::EntityState) => PduBody::EntityState(EntityStatePdu::decode(&mut cursor)?),
        Some(PduType::Fire) => PduBody::Fire(FirePdu::decode(&mut cursor)?),
        Some(PduType::Detonation) => PduBody::Detonation(DetonationPdu::decode(&mut cursor)?),
        Some(PduType::ElectromagneticEmission) => {
            PduBody::ElectromagneticEmission(EmissionPdu::decode(&mut cursor)?)
        }
        Some(PduType::Designator) => PduBody::Designator(DesignatorPdu::decode(&mut cursor)?),
        Some(PduType::Transmitter) => PduBody::Transmitter(TransmitterPdu::decode(&mut cursor)?),
        Some(PduType::Signal) => PduBody::Signal(SignalPdu::decode(&mut cursor)?),
        Some(PduType::Receiver) => PduBody::Receiver(ReceiverPdu::decode(&mut cursor)?),
        None => PduBody::Unparsed(body_bytes.to_vec()),
    })
}

/// Encode a PDU to a fresh buffer sized exactly to its wire length.
///
/// The declared length in the output always reflects the live body, never a
/// stale `pdu_length` carried in the header.
pub fn encode_pdu(pdu: &Pdu) -> WireResult<Vec<u8>> {
    let body_len = pdu.body.content_length();
    let mut buffer = vec![0u8; PduHeader::WIRE_LEN + body_len];
    let mut cursor = CursorMut::new(&mut buffer);
    pdu.header.encode(&mut cursor, body_len)?;
    pdu.body.encode(&mut cursor)?;
    Ok(buffer)
}

/// Decode a datagram carrying one or more concatenated PDUs.
///
/// Bundles walk the declared length of each PDU to find the next. A trailing
/// fragment shorter than a header, or a PDU whose declared length is
/// nonsensical, fails the whole bundle.
pub fn decode_bundle(buffer: &[u8]) -> WireResult<Vec<Pdu>> {
    let mut pdus = Vec::new();
    let mut offset = 0;
    while offset < buffer.len() {
        let rest = &buffer[offset..];
        let mut cursor = Cursor::new(rest);
        let header = PduHeader::decode(&mut cursor)?;

        let declared = header.pdu_length as usize;
        if declared < PduHeader::WIRE_LEN {
            return Err(WireError::MalformedHeader {
                reason: format!(
                    "bundled PDU at offset {} declares length {}",
                    offset, declared
                ),
            });
        }
        if declared > rest.len() {
            return Err(WireError::MalformedHeader {
                reason: format!(
                    "bundled PDU at offset {} declares {} bytes, {} remain",
                    offset,
                    declared,
                    rest.len()
                ),
            });
        }

        pdus.push(decode_pdu(&rest[..declared])?);
        offset += declared;
    }
    Ok(pdus)
}
