// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-layout DIS records.
//!
//! Every record here has a compile-time wire length (`WIRE_LEN`), so PDU
//! content lengths are closed-form sums instead of serialization dry-runs.

use crate::config::{ID_ALL, MARKING_LEN};
use crate::protocol::enums::{CamouflageType, DamageState};
use crate::wire::{Cursor, CursorMut, WireResult};

/// Three-part composite identifier naming a simulated object across a
/// federation: site, application, entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub site_id: u16,
    pub app_id: u16,
    pub entity_id: u16,
}

impl EntityId {
    pub const WIRE_LEN: usize = 6;

    pub fn new(site_id: u16, app_id: u16, entity_id: u16) -> Self {
        Self { site_id, app_id, entity_id }
    }

    /// True when the site field carries the "all sites" wildcard.
    pub fn is_all_sites(&self) -> bool {
        self.site_id == ID_ALL
    }

    /// True when the entity field carries the "all/no entity" wildcard.
    pub fn is_all_entities(&self) -> bool {
        self.entity_id == ID_ALL
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            site_id: cursor.read_u16()?,
            app_id: cursor.read_u16()?,
            entity_id: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u16(self.site_id)?;
        cursor.write_u16(self.app_id)?;
        cursor.write_u16(self.entity_id)
    }
}

/// Event identifier: originating site/application plus an event counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventId {
    pub site_id: u16,
    pub app_id: u16,
    pub event_id: u16,
}

impl EventId {
    pub const WIRE_LEN: usize = 6;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            site_id: cursor.read_u16()?,
            app_id: cursor.read_u16()?,
            event_id: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u16(self.site_id)?;
        cursor.write_u16(self.app_id)?;
        cursor.write_u16(self.event_id)
    }
}

/// Structured 8-byte entity type enumeration. Orders and hashes
/// structurally, so it doubles as a grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityType {
    pub kind: u8,
    pub domain: u8,
    pub country: u16,
    pub category: u8,
    pub subcategory: u8,
    pub specific: u8,
    pub extra: u8,
}

impl EntityType {
    pub const WIRE_LEN: usize = 8;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            kind: cursor.read_u8()?,
            domain: cursor.read_u8()?,
            country: cursor.read_u16()?,
            category: cursor.read_u8()?,
            subcategory: cursor.read_u8()?,
            specific: cursor.read_u8()?,
            extra: cursor.read_u8()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u8(self.kind)?;
        cursor.write_u8(self.domain)?;
        cursor.write_u16(self.country)?;
        cursor.write_u8(self.category)?;
        cursor.write_u8(self.subcategory)?;
        cursor.write_u8(self.specific)?;
        cursor.write_u8(self.extra)
    }
}

/// Single-precision 3-vector (velocities, relative locations).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorF32 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl VectorF32 {
    pub const WIRE_LEN: usize = 12;

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            x: cursor.read_f32()?,
            y: cursor.read_f32()?,
            z: cursor.read_f32()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_f32(self.x)?;
        cursor.write_f32(self.y)?;
        cursor.write_f32(self.z)
    }
}

/// Double-precision geocentric world coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldCoordinate {
    pub const WIRE_LEN: usize = 24;

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            x: cursor.read_f64()?,
            y: cursor.read_f64()?,
            z: cursor.read_f64()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_f64(self.x)?;
        cursor.write_f64(self.y)?;
        cursor.write_f64(self.z)
    }
}

/// Entity orientation as Euler angles (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub psi: f32,
    pub theta: f32,
    pub phi: f32,
}

impl EulerAngles {
    pub const WIRE_LEN: usize = 12;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            psi: cursor.read_f32()?,
            theta: cursor.read_f32()?,
            phi: cursor.read_f32()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_f32(self.psi)?;
        cursor.write_f32(self.theta)?;
        cursor.write_f32(self.phi)
    }
}

/// Munition burst descriptor shared by Fire and Detonation PDUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstDescriptor {
    pub munition: EntityType,
    pub warhead: u16,
    pub fuse: u16,
    pub quantity: u16,
    pub rate: u16,
}

impl BurstDescriptor {
    pub const WIRE_LEN: usize = 16;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            munition: EntityType::decode(cursor)?,
            warhead: cursor.read_u16()?,
            fuse: cursor.read_u16()?,
            quantity: cursor.read_u16()?,
            rate: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.munition.encode(cursor)?;
        cursor.write_u16(self.warhead)?;
        cursor.write_u16(self.fuse)?;
        cursor.write_u16(self.quantity)?;
        cursor.write_u16(self.rate)
    }
}

/// Dead-reckoning parameter block. The algorithm-specific "other
/// parameters" bytes pass through opaque; no physics here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadReckoning {
    pub algorithm: u8,
    pub other_parameters: [u8; 15],
    pub linear_acceleration: VectorF32,
    pub angular_velocity: VectorF32,
}

impl Default for DeadReckoning {
    fn default() -> Self {
        Self {
            algorithm: 0,
            other_parameters: [0; 15],
            linear_acceleration: VectorF32::default(),
            angular_velocity: VectorF32::default(),
        }
    }
}

impl DeadReckoning {
    pub const WIRE_LEN: usize = 40;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let algorithm = cursor.read_u8()?;
        let mut other_parameters = [0u8; 15];
        other_parameters.copy_from_slice(cursor.read_bytes(15)?);
        Ok(Self {
            algorithm,
            other_parameters,
            linear_acceleration: VectorF32::decode(cursor)?,
            angular_velocity: VectorF32::decode(cursor)?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u8(self.algorithm)?;
        cursor.write_bytes(&self.other_parameters)?;
        self.linear_acceleration.encode(cursor)?;
        self.angular_velocity.encode(cursor)
    }
}

/// Fixed 11-character entity marking (charset tag + 11 data bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMarking {
    text: [u8; MARKING_LEN],
}

impl Default for EntityMarking {
    fn default() -> Self {
        Self { text: [0; MARKING_LEN] }
    }
}

impl EntityMarking {
    pub const WIRE_LEN: usize = MARKING_LEN + 1;

    /// Set the marking text, zero-padding or truncating to 11 characters.
    pub fn set(&mut self, text: &str) {
        self.text = [0; MARKING_LEN];
        let bytes = text.as_bytes();
        let used = bytes.len().min(MARKING_LEN);
        self.text[..used].copy_from_slice(&bytes[..used]);
    }

    pub fn from_str(text: &str) -> Self {
        let mut marking = Self::default();
        marking.set(text);
        marking
    }

    pub fn as_str(&self) -> String {
        let end = self.text.iter().position(|&b| b == 0).unwrap_or(MARKING_LEN);
        String::from_utf8_lossy(&self.text[..end]).into_owned()
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let _charset = cursor.read_u8()?;
        let mut text = [0u8; MARKING_LEN];
        text.copy_from_slice(cursor.read_bytes(MARKING_LEN)?);
        Ok(Self { text })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u8(crate::config::ASCII_CHARSET)?;
        cursor.write_bytes(&self.text)
    }
}

/// 8-byte radio equipment type (Transmitter PDU).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioEntityType {
    pub kind: u8,
    pub domain: u8,
    pub country: u16,
    pub category: u8,
    pub nomenclature_version: u8,
    pub nomenclature: u16,
}

impl RadioEntityType {
    pub const WIRE_LEN: usize = 8;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            kind: cursor.read_u8()?,
            domain: cursor.read_u8()?,
            country: cursor.read_u16()?,
            category: cursor.read_u8()?,
            nomenclature_version: cursor.read_u8()?,
            nomenclature: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u8(self.kind)?;
        cursor.write_u8(self.domain)?;
        cursor.write_u16(self.country)?;
        cursor.write_u8(self.category)?;
        cursor.write_u8(self.nomenclature_version)?;
        cursor.write_u16(self.nomenclature)
    }
}

/// 8-byte radio modulation type (Transmitter PDU).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModulationType {
    pub spread_spectrum: u16,
    pub major: u16,
    pub detail: u16,
    pub system: u16,
}

impl ModulationType {
    pub const WIRE_LEN: usize = 8;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            spread_spectrum: cursor.read_u16()?,
            major: cursor.read_u16()?,
            detail: cursor.read_u16()?,
            system: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u16(self.spread_spectrum)?;
        cursor.write_u16(self.major)?;
        cursor.write_u16(self.detail)?;
        cursor.write_u16(self.system)
    }
}

/// Articulated part attached to an entity (turrets, gun barrels).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArticulationParameter {
    pub type_designator: u8,
    pub change_indicator: u8,
    pub part_attached_to: u16,
    pub parameter_type: u32,
    pub parameter_value: f64,
}

impl ArticulationParameter {
    pub const WIRE_LEN: usize = 16;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            type_designator: cursor.read_u8()?,
            change_indicator: cursor.read_u8()?,
            part_attached_to: cursor.read_u16()?,
            parameter_type: cursor.read_u32()?,
            parameter_value: cursor.read_f64()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_u8(self.type_designator)?;
        cursor.write_u8(self.change_indicator)?;
        cursor.write_u16(self.part_attached_to)?;
        cursor.write_u32(self.parameter_type)?;
        cursor.write_f64(self.parameter_value)
    }
}

/// Typed view over the EntityState 32-bit appearance word.
///
/// Bit layout per IEEE 1278.1: damage in bits 3-4, frozen in bit 21,
/// deactivated in bit 23, camouflage in bits 17-18.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityAppearance(pub u32);

impl EntityAppearance {
    pub fn damage_state(self) -> WireResult<DamageState> {
        DamageState::from_raw(((self.0 >> 3) & 0x3) as u8)
    }

    pub fn camouflage_type(self) -> CamouflageType {
        CamouflageType::from_raw(((self.0 >> 17) & 0x3) as u8)
    }

    pub fn is_frozen(self) -> bool {
        (self.0 >> 21) & 0x1 == 1
    }

    pub fn is_deactivated(self) -> bool {
        (self.0 >> 23) & 0x1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireError;

    #[test]
    fn test_entity_id_roundtrip_and_ordering() {
        let mut buffer = [0u8; EntityId::WIRE_LEN];
        let id = EntityId::new(12, 34, 56);
        id.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        assert_eq!(buffer, [0, 12, 0, 34, 0, 56]);

        let decoded = EntityId::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, id);

        // Structural ordering: site, then app, then entity.
        assert!(EntityId::new(1, 9, 9) < EntityId::new(2, 0, 0));
        assert!(EntityId::new(1, 1, 2) > EntityId::new(1, 1, 1));
    }

    #[test]
    fn test_entity_id_wildcards_roundtrip_exactly() {
        let all = EntityId::new(0xFFFF, 7, 0xFFFF);
        assert!(all.is_all_sites());
        assert!(all.is_all_entities());

        let mut buffer = [0u8; EntityId::WIRE_LEN];
        all.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = EntityId::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, all);
        assert_eq!(buffer[0], 0xFF);
        assert_eq!(buffer[1], 0xFF);
    }

    #[test]
    fn test_entity_type_is_a_map_key() {
        use std::collections::BTreeMap;

        let tank = EntityType { kind: 1, domain: 1, country: 225, category: 1, ..Default::default() };
        let mut counts: BTreeMap<EntityType, u32> = BTreeMap::new();
        *counts.entry(tank).or_default() += 1;
        *counts.entry(tank).or_default() += 1;
        assert_eq!(counts[&tank], 2);
    }

    #[test]
    fn test_fixed_records_consume_exact_lengths() {
        let buffer = [0u8; 128];
        let mut cursor = Cursor::new(&buffer);

        EntityType::decode(&mut cursor).expect("entity type");
        assert_eq!(cursor.offset(), EntityType::WIRE_LEN);

        WorldCoordinate::decode(&mut cursor).expect("world coordinate");
        assert_eq!(cursor.offset(), EntityType::WIRE_LEN + WorldCoordinate::WIRE_LEN);

        DeadReckoning::decode(&mut cursor).expect("dead reckoning");
        assert_eq!(
            cursor.offset(),
            EntityType::WIRE_LEN + WorldCoordinate::WIRE_LEN + DeadReckoning::WIRE_LEN
        );
    }

    #[test]
    fn test_burst_descriptor_roundtrip() {
        let burst = BurstDescriptor {
            munition: EntityType { kind: 2, domain: 9, country: 225, category: 2, ..Default::default() },
            warhead: 1000,
            fuse: 2050,
            quantity: 4,
            rate: 600,
        };

        let mut buffer = [0u8; BurstDescriptor::WIRE_LEN];
        burst.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        let decoded = BurstDescriptor::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, burst);
    }

    #[test]
    fn test_marking_pads_truncates_and_roundtrips() {
        let mut marking = EntityMarking::default();
        marking.set("EAGLE-1");
        assert_eq!(marking.as_str(), "EAGLE-1");

        marking.set("ABCDEFGHIJKLMNOP");
        assert_eq!(marking.as_str(), "ABCDEFGHIJK");

        let mut buffer = [0u8; EntityMarking::WIRE_LEN];
        marking.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        assert_eq!(buffer[0], crate::config::ASCII_CHARSET);
        let decoded = EntityMarking::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, marking);
    }

    #[test]
    fn test_appearance_bit_fields() {
        // Moderate damage (bits 3-4 = 2), forest camouflage (bits 17-18 = 2),
        // frozen (bit 21).
        let word = (2 << 3) | (2 << 17) | (1 << 21);
        let appearance = EntityAppearance(word);

        assert_eq!(appearance.damage_state().expect("two-bit field"), DamageState::ModerateDamage);
        assert_eq!(appearance.camouflage_type(), CamouflageType::Forest);
        assert!(appearance.is_frozen());
        assert!(!appearance.is_deactivated());
    }

    #[test]
    fn test_record_decode_propagates_end_of_data() {
        let buffer = [0u8; 5];
        let err = EntityId::decode(&mut Cursor::new(&buffer)).unwrap_err();
        assert_eq!(err, WireError::EndOfData { offset: 4, needed: 2 });
    }
}
