// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Nested variable-length records of the Electromagnetic Emission PDU.
//!
//! An emitter system contains beams, a beam contains track/jam targets. The
//! wire carries self-describing lengths (in 32-bit words) ahead of each
//! level; those are recomputed from the live collections on every encode,
//! never cached.

use crate::protocol::records::{EntityId, VectorF32};
use crate::wire::{Cursor, CursorMut, WireError, WireResult};

/// One tracked or jammed target. Fixed 8 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackJamData {
    pub entity: EntityId,
    pub emitter_id: u8,
    pub beam_id: u8,
}

impl TrackJamData {
    pub const WIRE_LEN: usize = 8;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            entity: EntityId::decode(cursor)?,
            emitter_id: cursor.read_u8()?,
            beam_id: cursor.read_u8()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.entity.encode(cursor)?;
        cursor.write_u8(self.emitter_id)?;
        cursor.write_u8(self.beam_id)
    }
}

/// Radar beam fundamentals: ten f32 fields, fixed 40 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FundamentalParameterData {
    pub frequency: f32,
    pub frequency_range: f32,
    pub effective_radiated_power: f32,
    pub pulse_repetition_frequency: f32,
    pub pulse_width: f32,
    pub beam_azimuth_center: f32,
    pub beam_azimuth_sweep: f32,
    pub beam_elevation_center: f32,
    pub beam_elevation_sweep: f32,
    pub beam_sweep_sync: f32,
}

impl FundamentalParameterData {
    pub const WIRE_LEN: usize = 40;

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        Ok(Self {
            frequency: cursor.read_f32()?,
            frequency_range: cursor.read_f32()?,
            effective_radiated_power: cursor.read_f32()?,
            pulse_repetition_frequency: cursor.read_f32()?,
            pulse_width: cursor.read_f32()?,
            beam_azimuth_center: cursor.read_f32()?,
            beam_azimuth_sweep: cursor.read_f32()?,
            beam_elevation_center: cursor.read_f32()?,
            beam_elevation_sweep: cursor.read_f32()?,
            beam_sweep_sync: cursor.read_f32()?,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        cursor.write_f32(self.frequency)?;
        cursor.write_f32(self.frequency_range)?;
        cursor.write_f32(self.effective_radiated_power)?;
        cursor.write_f32(self.pulse_repetition_frequency)?;
        cursor.write_f32(self.pulse_width)?;
        cursor.write_f32(self.beam_azimuth_center)?;
        cursor.write_f32(self.beam_azimuth_sweep)?;
        cursor.write_f32(self.beam_elevation_center)?;
        cursor.write_f32(self.beam_elevation_sweep)?;
        cursor.write_f32(self.beam_sweep_sync)
    }
}

/// One beam of an emitter system with its track/jam list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitterBeam {
    pub beam_id: u8,
    pub parameter_index: u16,
    pub parameters: FundamentalParameterData,
    pub beam_function: u8,
    pub high_density_track_jam: u8,
    pub jamming_mode_sequence: u32,
    pub track_jam_targets: Vec<TrackJamData>,
}

impl EmitterBeam {
    /// Fixed prefix ahead of the track/jam list.
    const FIXED_LEN: usize = 52;

    /// Current wire length, recomputed from the live target list.
    pub fn byte_length(&self) -> usize {
        Self::FIXED_LEN + self.track_jam_targets.len() * TrackJamData::WIRE_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        // Advisory on decode; the count field drives the loop.
        let _beam_data_length = cursor.read_u8()?;
        let beam_id = cursor.read_u8()?;
        let parameter_index = cursor.read_u16()?;
        let parameters = FundamentalParameterData::decode(cursor)?;
        let beam_function = cursor.read_u8()?;
        let target_count = cursor.read_u8()? as usize;
        let high_density_track_jam = cursor.read_u8()?;
        cursor.skip(1)?;
        let jamming_mode_sequence = cursor.read_u32()?;

        let mut track_jam_targets = Vec::with_capacity(target_count.min(64));
        for _ in 0..target_count {
            track_jam_targets.push(TrackJamData::decode(cursor)?);
        }

        Ok(Self {
            beam_id,
            parameter_index,
            parameters,
            beam_function,
            high_density_track_jam,
            jamming_mode_sequence,
            track_jam_targets,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        // Self-describing length in 32-bit words, derived from live state.
        cursor.write_len_u8(self.byte_length() / 4)?;
        cursor.write_u8(self.beam_id)?;
        cursor.write_u16(self.parameter_index)?;
        self.parameters.encode(cursor)?;
        cursor.write_u8(self.beam_function)?;
        cursor.write_len_u8(self.track_jam_targets.len())?;
        cursor.write_u8(self.high_density_track_jam)?;
        cursor.write_padding(1)?;
        cursor.write_u32(self.jamming_mode_sequence)?;
        for target in &self.track_jam_targets {
            target.encode(cursor)?;
        }
        Ok(())
    }
}

/// One emitter system with its beam list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitterSystem {
    pub emitter_name: u16,
    pub emitter_function: u8,
    pub emitter_id: u8,
    pub location: VectorF32,
    pub beams: Vec<EmitterBeam>,
}

impl EmitterSystem {
    /// Fixed prefix ahead of the beam list.
    const FIXED_LEN: usize = 20;

    /// Current wire length, recomputed from the live beam list.
    pub fn byte_length(&self) -> usize {
        Self::FIXED_LEN + self.beams.iter().map(EmitterBeam::byte_length).sum::<usize>()
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let _system_data_length = cursor.read_u8()?;
        let beam_count = cursor.read_u8()? as usize;
        cursor.skip(2)?;
        let emitter_name = cursor.read_u16()?;
        let emitter_function = cursor.read_u8()?;
        let emitter_id = cursor.read_u8()?;
        let location = VectorF32::decode(cursor)?;

        let mut beams = Vec::with_capacity(beam_count.min(64));
        for _ in 0..beam_count {
            beams.push(EmitterBeam::decode(cursor)?);
        }

        Ok(Self { emitter_name, emitter_function, emitter_id, location, beams })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        let words = self.byte_length() / 4;
        if words > u8::MAX as usize {
            // A system too large for its own length field must not truncate.
            return Err(WireError::OutOfRange { value: words as u64, max: u64::from(u8::MAX) });
        }
        cursor.write_u8(words as u8)?;
        cursor.write_len_u8(self.beams.len())?;
        cursor.write_padding(2)?;
        cursor.write_u16(self.emitter_name)?;
        cursor.write_u8(self.emitter_function)?;
        cursor.write_u8(self.emitter_id)?;
        self.location.encode(cursor)?;
        for beam in &self.beams {
            beam.encode(cursor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_beam(targets: usize) -> EmitterBeam {
        EmitterBeam {
            beam_id: 1,
            parameter_index: 1200,
            parameters: FundamentalParameterData {
                frequency: 9_600_000_000.0,
                effective_radiated_power: 50.0,
                pulse_width: 1.5,
                ..Default::default()
            },
            beam_function: 2,
            high_density_track_jam: 0,
            jamming_mode_sequence: 0,
            track_jam_targets: (0..targets)
                .map(|i| TrackJamData {
                    entity: EntityId::new(1, 1, i as u16 + 1),
                    emitter_id: 0,
                    beam_id: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_beam_length_tracks_target_list() {
        let mut beam = sample_beam(0);
        assert_eq!(beam.byte_length(), 52);

        beam.track_jam_targets.push(TrackJamData::default());
        beam.track_jam_targets.push(TrackJamData::default());
        // Recomputed from the live collection, not a stale cache.
        assert_eq!(beam.byte_length(), 52 + 16);
    }

    #[test]
    fn test_beam_roundtrip_with_targets() {
        let beam = sample_beam(3);
        let mut buffer = vec![0u8; beam.byte_length()];
        beam.encode(&mut CursorMut::new(&mut buffer)).expect("encode");

        // Word length and count fields match the live collection.
        assert_eq!(buffer[0] as usize, beam.byte_length() / 4);
        assert_eq!(buffer[45], 3);

        let decoded = EmitterBeam::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, beam);
    }

    #[test]
    fn test_system_roundtrip_nested() {
        let system = EmitterSystem {
            emitter_name: 45300,
            emitter_function: 1,
            emitter_id: 1,
            location: VectorF32::new(0.0, 0.0, -4.0),
            beams: vec![sample_beam(0), sample_beam(2)],
        };

        let mut buffer = vec![0u8; system.byte_length()];
        system.encode(&mut CursorMut::new(&mut buffer)).expect("encode");
        assert_eq!(buffer[0] as usize, system.byte_length() / 4);
        assert_eq!(buffer[1], 2);

        let decoded = EmitterSystem::decode(&mut Cursor::new(&buffer)).expect("decode");
        assert_eq!(decoded, system);
    }

    #[test]
    fn test_system_too_large_for_word_length_rejected() {
        // 52-byte beams: past 255 words the u8 length field cannot describe
        // the system and encode must refuse rather than truncate.
        let system = EmitterSystem {
            beams: (0..25).map(|_| sample_beam(0)).collect(),
            ..Default::default()
        };
        assert!(system.byte_length() / 4 > u8::MAX as usize);

        let mut buffer = vec![0u8; system.byte_length()];
        let err = system.encode(&mut CursorMut::new(&mut buffer)).unwrap_err();
        assert!(matches!(err, WireError::OutOfRange { .. }));
    }

    #[test]
    fn test_beam_decode_truncated_target_list() {
        let beam = sample_beam(2);
        let mut buffer = vec![0u8; beam.byte_length()];
        beam.encode(&mut CursorMut::new(&mut buffer)).expect("encode");

        // Chop off the second target; the count still promises two.
        buffer.truncate(beam.byte_length() - 4);
        let err = EmitterBeam::decode(&mut Cursor::new(&buffer)).unwrap_err();
        assert!(matches!(err, crate::wire::WireError::EndOfData { .. }));
    }
}
