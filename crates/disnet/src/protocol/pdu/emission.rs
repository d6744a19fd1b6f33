// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Electromagnetic Emission PDU: radar/jammer emitter state with nested
//! systems, beams, and track/jam targets.

use crate::protocol::emissions::EmitterSystem;
use crate::protocol::records::{EntityId, EventId};
use crate::wire::{Cursor, CursorMut, WireResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmissionPdu {
    pub emitting_entity_id: EntityId,
    pub event_id: EventId,
    pub state_update_indicator: u8,
    pub systems: Vec<EmitterSystem>,
}

impl EmissionPdu {
    /// Fixed body bytes ahead of the system list.
    const FIXED_LEN: usize = 16;

    /// Body length, recomputed from the live system tree.
    pub fn content_length(&self) -> usize {
        Self::FIXED_LEN + self.systems.iter().map(EmitterSystem::byte_length).sum::<usize>()
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let emitting_entity_id = EntityId::decode(cursor)?;
        let event_id = EventId::decode(cursor)?;
        let state_update_indicator = cursor.read_u8()?;
        let system_count = cursor.read_u8()? as usize;
        cursor.skip(2)?;

        let mut systems = Vec::with_capacity(system_count.min(16));
        for _ in 0..system_count {
            systems.push(EmitterSystem::decode(cursor)?);
        }

        Ok(Self { emitting_entity_id, event_id, state_update_indicator, systems })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.emitting_entity_id.encode(cursor)?;
        self.event_id.encode(cursor)?;
        cursor.write_u8(self.state_update_indicator)?;
        cursor.write_len_u8(self.systems.len())?;
        cursor.write_padding(2)?;
        for system in &self.systems {
            system.encode(cursor)?;
        }
        Ok(())
    }
}
