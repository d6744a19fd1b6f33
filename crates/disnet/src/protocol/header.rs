// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The fixed 12-byte header every DIS PDU begins with.

use crate::config::PDU_HEADER_LEN;
use crate::protocol::enums::{ProtocolFamily, ProtocolVersion};
use crate::wire::{Cursor, CursorMut, WireError, WireResult};

/// Known PDU kinds this codec decodes into typed bodies.
///
/// The header stores the raw type byte; this enum only exists at the factory
/// dispatch boundary, so unknown kinds flow through untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduType {
    EntityState,
    Fire,
    Detonation,
    ElectromagneticEmission,
    Designator,
    Transmitter,
    Signal,
    Receiver,
}

impl PduType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::EntityState),
            2 => Some(Self::Fire),
            3 => Some(Self::Detonation),
            23 => Some(Self::ElectromagneticEmission),
            24 => Some(Self::Designator),
            25 => Some(Self::Transmitter),
            26 => Some(Self::Signal),
            27 => Some(Self::Receiver),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::EntityState => 1,
            Self::Fire => 2,
            Self::Detonation => 3,
            Self::ElectromagneticEmission => 23,
            Self::Designator => 24,
            Self::Transmitter => 25,
            Self::Signal => 26,
            Self::Receiver => 27,
        }
    }

    /// The protocol family each PDU kind belongs to.
    pub fn family(self) -> ProtocolFamily {
        match self {
            Self::EntityState => ProtocolFamily::EntityInformation,
            Self::Fire | Self::Detonation => ProtocolFamily::Warfare,
            Self::ElectromagneticEmission | Self::Designator => {
                ProtocolFamily::DistributedEmissionRegeneration
            }
            Self::Transmitter | Self::Signal | Self::Receiver => {
                ProtocolFamily::RadioCommunications
            }
        }
    }
}

/// Fixed 12-byte PDU header.
///
/// `pdu_length` is the declared total length including the header itself;
/// it is recomputed from live body state on every encode. Decode treats a
/// declared length shorter than the supplied buffer as authoritative (the
/// tail is padding) and never reads past either bound.
///
/// Because the length is derived, it is excluded from equality: a freshly
/// built header compares equal to its decoded round-trip.
#[derive(Debug, Clone, Copy, Eq)]
pub struct PduHeader {
    pub protocol_version: ProtocolVersion,
    pub exercise_id: u8,
    pub pdu_type: u8,
    pub protocol_family: ProtocolFamily,
    pub timestamp: u32,
    pub pdu_length: u16,
    pub pdu_status: u8,
    pub padding: u8,
}

impl PartialEq for PduHeader {
    fn eq(&self, other: &Self) -> bool {
        self.protocol_version == other.protocol_version
            && self.exercise_id == other.exercise_id
            && self.pdu_type == other.pdu_type
            && self.protocol_family == other.protocol_family
            && self.timestamp == other.timestamp
            && self.pdu_status == other.pdu_status
            && self.padding == other.padding
    }
}

impl PduHeader {
    pub const WIRE_LEN: usize = PDU_HEADER_LEN;

    pub fn new(pdu_type: PduType, exercise_id: u8) -> Self {
        Self {
            protocol_version: ProtocolVersion::default(),
            exercise_id,
            pdu_type: pdu_type.raw(),
            protocol_family: pdu_type.family(),
            timestamp: 0,
            pdu_length: 0,
            pdu_status: 0,
            padding: 0,
        }
    }

    /// Typed view of the raw type byte, when this codec knows the kind.
    pub fn pdu_type(&self) -> Option<PduType> {
        PduType::from_raw(self.pdu_type)
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        if cursor.remaining() < Self::WIRE_LEN {
            return Err(WireError::MalformedHeader {
                reason: format!(
                    "buffer holds {} bytes, header needs {}",
                    cursor.remaining(),
                    Self::WIRE_LEN
                ),
            });
        }
        Ok(Self {
            protocol_version: ProtocolVersion::from_raw(cursor.read_u8()?),
            exercise_id: cursor.read_u8()?,
            pdu_type: cursor.read_u8()?,
            protocol_family: ProtocolFamily::from_raw(cursor.read_u8()?),
            timestamp: cursor.read_u32()?,
            pdu_length: cursor.read_u16()?,
            pdu_status: cursor.read_u8()?,
            padding: cursor.read_u8()?,
        })
    }

    /// Encode the header, writing `body_len + 12` as the declared length.
    pub fn encode(&self, cursor: &mut CursorMut<'_>, body_len: usize) -> WireResult<()> {
        let total = Self::WIRE_LEN + body_len;
        if total > u16::MAX as usize {
            return Err(WireError::OutOfRange { value: total as u64, max: u64::from(u16::MAX) });
        }
        cursor.write_u8(self.protocol_version.raw())?;
        cursor.write_u8(self.exercise_id)?;
        cursor.write_u8(self.pdu_type)?;
        cursor.write_u8(self.protocol_family.raw())?;
        cursor.write_u32(self.timestamp)?;
        cursor.write_u16(total as u16)?;
        cursor.write_u8(self.pdu_status)?;
        cursor.write_u8(self.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let mut header = PduHeader::new(PduType::Fire, 3);
        header.timestamp = 0xDEAD_BEEF;
        header.pdu_status = 4;

        let mut buffer = [0u8; PduHeader::WIRE_LEN];
        header.encode(&mut CursorMut::new(&mut buffer), 84).expect("encode");

        let decoded = PduHeader::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded.protocol_version, ProtocolVersion::Dis6);
        assert_eq!(decoded.exercise_id, 3);
        assert_eq!(decoded.pdu_type(), Some(PduType::Fire));
        assert_eq!(decoded.protocol_family, ProtocolFamily::Warfare);
        assert_eq!(decoded.timestamp, 0xDEAD_BEEF);
        assert_eq!(decoded.pdu_length, 96);
        assert_eq!(decoded.pdu_status, 4);
    }

    #[test]
    fn test_header_decode_short_buffer_is_malformed() {
        let buffer = [0u8; 7];
        let err = PduHeader::decode(&mut Cursor::new(&buffer)).unwrap_err();
        assert!(matches!(err, WireError::MalformedHeader { .. }));
    }

    #[test]
    fn test_header_length_recomputed_on_encode() {
        let mut header = PduHeader::new(PduType::EntityState, 1);
        header.pdu_length = 9999; // stale, must be ignored

        let mut buffer = [0u8; PduHeader::WIRE_LEN];
        header.encode(&mut CursorMut::new(&mut buffer), 120).expect("encode");
        let decoded = PduHeader::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded.pdu_length, 132);
    }

    #[test]
    fn test_header_equality_ignores_derived_length() {
        let built = PduHeader::new(PduType::Fire, 3);

        let mut carried = built;
        carried.pdu_length = 96; // as decode would carry from the wire
        assert_eq!(built, carried);

        carried.timestamp = 1;
        assert_ne!(built, carried);
    }

    #[test]
    fn test_unknown_type_byte_survives_header() {
        let raw = [6u8, 1, 200, 9, 0, 0, 0, 0, 0, 20, 0, 0];
        let header = PduHeader::decode(&mut Cursor::new(&raw)).expect("decode");
        assert_eq!(header.pdu_type, 200);
        assert_eq!(header.pdu_type(), None);
        assert_eq!(header.protocol_family, ProtocolFamily::Other(9));
    }

    #[test]
    fn test_pdu_type_family_mapping() {
        assert_eq!(PduType::EntityState.family(), ProtocolFamily::EntityInformation);
        assert_eq!(PduType::Detonation.family(), ProtocolFamily::Warfare);
        assert_eq!(PduType::Signal.family(), ProtocolFamily::RadioCommunications);
        for raw in [1u8, 2, 3, 23, 24, 25, 26, 27] {
            assert_eq!(PduType::from_raw(raw).expect("known").raw(), raw);
        }
    }
}
