// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Designator PDU: a laser designator painting a target.

use crate::protocol::records::{EntityId, VectorF32, WorldCoordinate};
use crate::wire::{Cursor, CursorMut, WireResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignatorPdu {
    pub designating_entity_id: EntityId,
    pub code_name: u16,
    pub designated_entity_id: EntityId,
    pub designator_code: u16,
    pub designator_power: f32,
    pub designator_wavelength: f32,
    /// Spot offset in the designated entity's body coordinates.
    pub spot_wrt_designated: VectorF32,
    pub spot_location: WorldCoordinate,
    pub dead_reckoning_algorithm: u8,
    pub entity_linear_acceleration: VectorF32,
}

impl DesignatorPdu {
    pub const CONTENT_LEN: usize = 76;

    pub fn content_length(&self) -> usize {
        Self::CONTENT_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let designating_entity_id = EntityId::decode(cursor)?;
        let code_name = cursor.read_u16()?;
        let designated_entity_id = EntityId::decode(cursor)?;
        let designator_code = cursor.read_u16()?;
        let designator_power = cursor.read_f32()?;
        let designator_wavelength = cursor.read_f32()?;
        let spot_wrt_designated = VectorF32::decode(cursor)?;
        let spot_location = WorldCoordinate::decode(cursor)?;
        let dead_reckoning_algorithm = cursor.read_u8()?;
        cursor.skip(3)?;
        let entity_linear_acceleration = VectorF32::decode(cursor)?;

        Ok(Self {
            designating_entity_id,
            code_name,
            designated_entity_id,
            designator_code,
            designator_power,
            designator_wavelength,
            spot_wrt_designated,
            spot_location,
            dead_reckoning_algorithm,
            entity_linear_acceleration,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.designating_entity_id.encode(cursor)?;
        cursor.write_u16(self.code_name)?;
        self.designated_entity_id.encode(cursor)?;
        cursor.write_u16(self.designator_code)?;
        cursor.write_f32(self.designator_power)?;
        cursor.write_f32(self.designator_wavelength)?;
        self.spot_wrt_designated.encode(cursor)?;
        self.spot_location.encode(cursor)?;
        cursor.write_u8(self.dead_reckoning_algorithm)?;
        cursor.write_padding(3)?;
        self.entity_linear_acceleration.encode(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designator_roundtrip() {
        let pdu = DesignatorPdu {
            designating_entity_id: EntityId::new(1, 1, 50),
            code_name: 1,
            designated_entity_id: EntityId::new(2, 1, 60),
            designator_code: 1688,
            designator_power: 80.0,
            designator_wavelength: 1.064,
            spot_wrt_designated: VectorF32::new(0.1, 0.2, 0.0),
            spot_location: WorldCoordinate::new(100.0, 200.0, 300.0),
            dead_reckoning_algorithm: 2,
            entity_linear_acceleration: VectorF32::new(0.0, 0.0, -9.8),
        };

        assert_eq!(pdu.content_length(), 76);
        let mut buffer = vec![0u8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = DesignatorPdu::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn test_designator_padding_is_zero_on_wire() {
        let pdu = DesignatorPdu { dead_reckoning_algorithm: 9, ..Default::default() };
        let mut buffer = vec![0xFFu8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        // Three pad bytes after the dead reckoning algorithm at offset 60.
        assert_eq!(&buffer[61..64], &[0, 0, 0]);
    }
}
