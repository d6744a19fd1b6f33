// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Warfare-family PDUs: weapon fire and detonation events.

use crate::protocol::enums::DetonationResult;
use crate::protocol::records::{
    ArticulationParameter, BurstDescriptor, EntityId, EventId, VectorF32, WorldCoordinate,
};
use crate::wire::{Cursor, CursorMut, WireResult};

/// Fire PDU: a weapon has been fired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FirePdu {
    pub firing_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub munition_id: EntityId,
    pub event_id: EventId,
    pub fire_mission_index: u32,
    pub location: WorldCoordinate,
    pub burst_descriptor: BurstDescriptor,
    pub velocity: VectorF32,
    pub range: f32,
}

impl FirePdu {
    pub const CONTENT_LEN: usize = 84;

    pub fn content_length(&self) -> usize {
        Self::CONTENT_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            firing_entity_id: EntityId::decode(cursor)?,
            target_entity_id: EntityId::decode(cursor)?,
            munition_id: EntityId::decode(cursor)?,
            event_id: EventId::decode(cursor)?,
            fire_mission_index: cursor.read_u32()?,
            location: WorldCoordinate::decode(cursor)?,
            burst_descriptor: BurstDescriptor::decode(cursor)?,
            velocity: VectorF32::decode(cursor)?,
            range: cursor.read_f32()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.firing_entity_id.encode(cursor)?;
        self.target_entity_id.encode(cursor)?;
        self.munition_id.encode(cursor)?;
        self.event_id.encode(cursor)?;
        cursor.write_u32(self.fire_mission_index)?;
        self.location.encode(cursor)?;
        self.burst_descriptor.encode(cursor)?;
        self.velocity.encode(cursor)?;
        cursor.write_f32(self.range)
    }
}

/// Detonation PDU: a munition has detonated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetonationPdu {
    pub firing_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub munition_id: EntityId,
    pub event_id: EventId,
    pub velocity: VectorF32,
    pub location: WorldCoordinate,
    pub burst_descriptor: BurstDescriptor,
    /// Impact point in the target's body coordinates.
    pub location_in_entity: VectorF32,
    pub result: DetonationResult,
    pub articulation_parameters: Vec<ArticulationParameter>,
}

impl DetonationPdu {
    const FIXED_LEN: usize = 92;

    pub fn content_length(&self) -> usize {
        Self::FIXED_LEN
            + self.articulation_parameters.len() * ArticulationParameter::WIRE_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let firing_entity_id = EntityId::decode(cursor)?;
        let target_entity_id = EntityId::decode(cursor)?;
        let munition_id = EntityId::decode(cursor)?;
        let event_id = EventId::decode(cursor)?;
        let velocity = VectorF32::decode(cursor)?;
        let location = WorldCoordinate::decode(cursor)?;
        let burst_descriptor = BurstDescriptor::decode(cursor)?;
        let location_in_entity = VectorF32::decode(cursor)?;
        let result = DetonationResult::from_raw(cursor.read_u8()?);
        let articulation_count = cursor.read_u8()? as usize;
        cursor.skip(2)?;

        let mut articulation_parameters = Vec::with_capacity(articulation_count.min(64));
        for _ in 0..articulation_count {
            articulation_parameters.push(ArticulationParameter::decode(cursor)?);
        }

        Ok(Self {
            firing_entity_id,
            target_entity_id,
            munition_id,
            event_id,
            velocity,
            location,
            burst_descriptor,
            location_in_entity,
            result,
            articulation_parameters,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.firing_entity_id.encode(cursor)?;
        self.target_entity_id.encode(cursor)?;
        self.munition_id.encode(cursor)?;
        self.event_id.encode(cursor)?;
        self.velocity.encode(cursor)?;
        self.location.encode(cursor)?;
        self.burst_descriptor.encode(cursor)?;
        self.location_in_entity.encode(cursor)?;
        cursor.write_u8(self.result.raw())?;
        cursor.write_len_u8(self.articulation_parameters.len())?;
        cursor.write_padding(2)?;
        for parameter in &self.articulation_parameters {
            parameter.encode(cursor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::records::EntityType;

    fn sample_burst() -> BurstDescriptor {
        BurstDescriptor {
            munition: EntityType { kind: 2, domain: 9, country: 225, category: 2, ..Default::default() },
            warhead: 1000,
            fuse: 2050,
            quantity: 1,
            rate: 0,
        }
    }

    #[test]
    fn test_fire_roundtrip() {
        let pdu = FirePdu {
            firing_entity_id: EntityId::new(1, 1, 10),
            target_entity_id: EntityId::new(2, 1, 99),
            munition_id: EntityId::new(1, 1, 5000),
            event_id: EventId { site_id: 1, app_id: 1, event_id: 17 },
            fire_mission_index: 0,
            location: WorldCoordinate::new(1.0, 2.0, 3.0),
            burst_descriptor: sample_burst(),
            velocity: VectorF32::new(300.0, 10.0, -5.0),
            range: 4800.0,
        };

        assert_eq!(pdu.content_length(), 84);
        let mut buffer = vec![0u8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = FirePdu::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn test_detonation_roundtrip_with_articulations() {
        let pdu = DetonationPdu {
            firing_entity_id: EntityId::new(1, 1, 10),
            target_entity_id: EntityId::new(2, 1, 99),
            munition_id: EntityId::new(1, 1, 5000),
            event_id: EventId { site_id: 1, app_id: 1, event_id: 18 },
            velocity: VectorF32::new(250.0, 8.0, -40.0),
            location: WorldCoordinate::new(10.0, 20.0, 30.0),
            burst_descriptor: sample_burst(),
            location_in_entity: VectorF32::new(0.5, -0.5, 1.0),
            result: DetonationResult::EntityImpact,
            articulation_parameters: vec![ArticulationParameter {
                parameter_type: 4107,
                parameter_value: 2.0,
                ..Default::default()
            }],
        };

        assert_eq!(pdu.content_length(), 92 + 16);
        let mut buffer = vec![0u8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = DetonationPdu::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, pdu);
        assert_eq!(decoded.result, DetonationResult::EntityImpact);
    }

    #[test]
    fn test_detonation_unknown_result_is_lenient() {
        let mut pdu = DetonationPdu::default();
        pdu.result = DetonationResult::Other(77);

        let mut buffer = vec![0u8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = DetonationPdu::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded.result, DetonationResult::Other(77));
    }

    #[test]
    fn test_detonation_truncated_fails_cleanly() {
        let pdu = DetonationPdu::default();
        let mut buffer = vec![0u8; pdu.content_length()];
        pdu.encode(&mut CursorMut::new(&mut buffer)).expect("encode");

        buffer.truncate(40);
        assert!(DetonationPdu::decode(&mut Cursor::new(&buffer)).is_err());
    }
}
