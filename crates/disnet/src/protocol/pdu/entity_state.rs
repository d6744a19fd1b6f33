// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity State PDU: position, orientation, appearance, and articulated
//! parts of one simulated entity.

use crate::protocol::enums::ForceId;
use crate::protocol::records::{
    ArticulationParameter, DeadReckoning, EntityAppearance, EntityId, EntityMarking, EntityType,
    EulerAngles, VectorF32, WorldCoordinate,
};
use crate::wire::{Cursor, CursorMut, WireResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStatePdu {
    pub entity_id: EntityId,
    pub force_id: ForceId,
    pub entity_type: EntityType,
    pub alternative_entity_type: EntityType,
    pub linear_velocity: VectorF32,
    pub location: WorldCoordinate,
    pub orientation: EulerAngles,
    pub appearance: EntityAppearance,
    pub dead_reckoning: DeadReckoning,
    pub marking: EntityMarking,
    pub capabilities: u32,
    pub articulation_parameters: Vec<ArticulationParameter>,
}

impl EntityStatePdu {
    /// Fixed body bytes ahead of the articulation list: ids (8), types (16),
    /// velocity (12), location (24), orientation (12), appearance (4), dead
    /// reckoning (40), marking (12), capabilities (4).
    const FIXED_LEN: usize = 132;

    /// Body length, recomputed from the live articulation list.
    pub fn content_length(&self) -> usize {
        Self::FIXED_LEN
            + self.articulation_parameters.len() * ArticulationParameter::WIRE_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let entity_id = EntityId::decode(cursor)?;
        let force_id = ForceId::from_raw(cursor.read_u8()?);
        let articulation_count = cursor.read_u8()? as usize;
        let entity_type = EntityType::decode(cursor)?;
        let alternative_entity_type = EntityType::decode(cursor)?;
        let linear_velocity = VectorF32::decode(cursor)?;
        let location = WorldCoordinate::decode(cursor)?;
        let orientation = EulerAngles::decode(cursor)?;
        let appearance = EntityAppearance(cursor.read_u32()?);
        let dead_reckoning = DeadReckoning::decode(cursor)?;
        let marking = EntityMarking::decode(cursor)?;
        let capabilities = cursor.read_u32()?;

        let mut articulation_parameters = Vec::with_capacity(articulation_count.min(64));
        for _ in 0..articulation_count {
            articulation_parameters.push(ArticulationParameter::decode(cursor)?);
        }

        Ok(Self {
            entity_id,
            force_id,
            entity_type,
            alternative_entity_type,
            linear_velocity,
            location,
            orientation,
            appearance,
            dead_reckoning,
            marking,
            capabilities,
            articulation_parameters,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.entity_id.encode(cursor)?;
        cursor.write_u8(self.force_id.raw())?;
        cursor.write_len_u8(self.articulation_parameters.len())?;
        self.entity_type.encode(cursor)?;
        self.alternative_entity_type.encode(cursor)?;
        self.linear_velocity.encode(cursor)?;
        self.location.encode(cursor)?;
        self.orientation.encode(cursor)?;
        cursor.write_u32(self.appearance.0)?;
        self.dead_reckoning.encode(cursor)?;
        self.marking.encode(cursor)?;
        cursor.write_u32(self.capabilities)?;
        for parameter in &self.articulation_parameters {
            parameter.encode(cursor)?;
        }
        Ok(())
    }
}
