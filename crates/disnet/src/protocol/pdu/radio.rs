// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Radio-communications PDUs: Transmitter, Signal, Receiver.
//!
//! Transmitter carries two trailing variable blobs (modulation parameters
//! and antenna pattern) whose lengths must fall on a 64-bit boundary.
//! Signal carries bit-granular sample data whose byte size is
//! `ceil(data_length_bits / 8)`.

use crate::config::BLOB_ALIGNMENT;
use crate::protocol::enums::TransmitState;
use crate::protocol::records::{
    EntityId, ModulationType, RadioEntityType, VectorF32, WorldCoordinate,
};
use crate::wire::{Cursor, CursorMut, WireError, WireResult};

/// Transmitter PDU: state of one radio transmitter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmitterPdu {
    pub entity_id: EntityId,
    pub radio_id: u16,
    pub radio_entity_type: RadioEntityType,
    pub transmit_state: TransmitState,
    pub input_source: u8,
    pub antenna_location: WorldCoordinate,
    pub relative_antenna_location: VectorF32,
    pub antenna_pattern_type: u16,
    pub frequency: u64,
    pub transmit_frequency_bandwidth: f32,
    pub power: f32,
    pub modulation_type: ModulationType,
    pub crypto_system: u16,
    pub crypto_key_id: u16,
    /// Must be 64-bit aligned (`len % 8 == 0`) or encode fails.
    pub modulation_parameters: Vec<u8>,
    /// Must be 64-bit aligned (`len % 8 == 0`) or encode fails.
    pub antenna_pattern_parameters: Vec<u8>,
}

impl Default for TransmitterPdu {
    fn default() -> Self {
        Self {
            entity_id: EntityId::default(),
            radio_id: 0,
            radio_entity_type: RadioEntityType::default(),
            transmit_state: TransmitState::Off,
            input_source: 0,
            antenna_location: WorldCoordinate::default(),
            relative_antenna_location: VectorF32::default(),
            antenna_pattern_type: 0,
            frequency: 0,
            transmit_frequency_bandwidth: 0.0,
            power: 0.0,
            modulation_type: ModulationType::default(),
            crypto_system: 0,
            crypto_key_id: 0,
            modulation_parameters: Vec::new(),
            antenna_pattern_parameters: Vec::new(),
        }
    }
}

impl TransmitterPdu {
    const FIXED_LEN: usize = 92;

    pub fn content_length(&self) -> usize {
        Self::FIXED_LEN + self.modulation_parameters.len() + self.antenna_pattern_parameters.len()
    }

    fn check_alignment(&self) -> WireResult<()> {
        for blob in [&self.modulation_parameters, &self.antenna_pattern_parameters] {
            if blob.len() % BLOB_ALIGNMENT != 0 {
                return Err(WireError::AlignmentViolation {
                    len: blob.len(),
                    boundary: BLOB_ALIGNMENT,
                });
            }
        }
        Ok(())
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let entity_id = EntityId::decode(cursor)?;
        let radio_id = cursor.read_u16()?;
        let radio_entity_type = RadioEntityType::decode(cursor)?;
        let transmit_state = TransmitState::from_raw(cursor.read_u8()?);
        let input_source = cursor.read_u8()?;
        cursor.skip(2)?;
        let antenna_location = WorldCoordinate::decode(cursor)?;
        let relative_antenna_location = VectorF32::decode(cursor)?;
        let antenna_pattern_type = cursor.read_u16()?;
        let antenna_pattern_len = cursor.read_u16()? as usize;
        let frequency = cursor.read_u64()?;
        let transmit_frequency_bandwidth = cursor.read_f32()?;
        let power = cursor.read_f32()?;
        let modulation_type = ModulationType::decode(cursor)?;
        let crypto_system = cursor.read_u16()?;
        let crypto_key_id = cursor.read_u16()?;
        let modulation_len = cursor.read_u8()? as usize;
        cursor.skip(3)?;
        let modulation_parameters = cursor.read_bytes(modulation_len)?.to_vec();
        let antenna_pattern_parameters = cursor.read_bytes(antenna_pattern_len)?.to_vec();

        Ok(Self {
            entity_id,
            radio_id,
            radio_entity_type,
            transmit_state,
            input_source,
            antenna_location,
            relative_antenna_location,
            antenna_pattern_type,
            frequency,
            transmit_frequency_bandwidth,
            power,
            modulation_type,
            crypto_system,
            crypto_key_id,
            modulation_parameters,
            antenna_pattern_parameters,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.check_alignment()?;
        self.entity_id.encode(cursor)?;
        cursor.write_u16(self.radio_id)?;
        self.radio_entity_type.encode(cursor)?;
        cursor.write_u8(self.transmit_state.raw())?;
        cursor.write_u8(self.input_source)?;
        cursor.write_padding(2)?;
        self.antenna_location.encode(cursor)?;
        self.relative_antenna_location.encode(cursor)?;
        cursor.write_u16(self.antenna_pattern_type)?;
        cursor.write_len_u16(self.antenna_pattern_parameters.len())?;
        cursor.write_u64(self.frequency)?;
        cursor.write_f32(self.transmit_frequency_bandwidth)?;
        cursor.write_f32(self.power)?;
        self.modulation_type.encode(cursor)?;
        cursor.write_u16(self.crypto_system)?;
        cursor.write_u16(self.crypto_key_id)?;
        cursor.write_len_u8(self.modulation_parameters.len())?;
        cursor.write_padding(3)?;
        cursor.write_bytes(&self.modulation_parameters)?;
        cursor.write_bytes(&self.antenna_pattern_parameters)
    }
}

/// Signal PDU: one block of transmitted radio samples or data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalPdu {
    pub entity_id: EntityId,
    pub radio_id: u16,
    pub encoding_scheme: u16,
    pub tdl_type: u16,
    pub sample_rate: u32,
    pub samples: u16,
    data_length_bits: u16,
    data: Vec<u8>,
}

impl SignalPdu {
    const FIXED_LEN: usize = 20;

    /// Bytes needed to hold `bits` of data, rounded up to a whole byte.
    fn required_bytes(bits: u16) -> usize {
        (bits as usize).div_ceil(8)
    }

    /// Set the payload, validating the byte buffer against the bit length.
    pub fn set_data(&mut self, data_length_bits: u16, data: Vec<u8>) -> WireResult<()> {
        let required = Self::required_bytes(data_length_bits);
        if data.len() != required {
            return Err(WireError::InvalidData {
                reason: format!(
                    "{} bits require {} data bytes, got {}",
                    data_length_bits,
                    required,
                    data.len()
                ),
            });
        }
        self.data_length_bits = data_length_bits;
        self.data = data;
        Ok(())
    }

    pub fn data_length_bits(&self) -> u16 {
        self.data_length_bits
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn content_length(&self) -> usize {
        Self::FIXED_LEN + self.data.len()
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let entity_id = EntityId::decode(cursor)?;
        let radio_id = cursor.read_u16()?;
        let encoding_scheme = cursor.read_u16()?;
        let tdl_type = cursor.read_u16()?;
        let sample_rate = cursor.read_u32()?;
        let data_length_bits = cursor.read_u16()?;
        let samples = cursor.read_u16()?;
        let data = cursor.read_bytes(Self::required_bytes(data_length_bits))?.to_vec();

        Ok(Self {
            entity_id,
            radio_id,
            encoding_scheme,
            tdl_type,
            sample_rate,
            samples,
            data_length_bits,
            data,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        // Re-validate: fields are public up to the data pair, and a stale
        // mismatch must never reach the wire.
        let required = Self::required_bytes(self.data_length_bits);
        if self.data.len() != required {
            return Err(WireError::InvalidData {
                reason: format!(
                    "{} bits require {} data bytes, got {}",
                    self.data_length_bits,
                    required,
                    self.data.len()
                ),
            });
        }
        self.entity_id.encode(cursor)?;
        cursor.write_u16(self.radio_id)?;
        cursor.write_u16(self.encoding_scheme)?;
        cursor.write_u16(self.tdl_type)?;
        cursor.write_u32(self.sample_rate)?;
        cursor.write_u16(self.data_length_bits)?;
        cursor.write_u16(self.samples)?;
        cursor.write_bytes(&self.data)
    }
}

/// Receiver PDU: state of one radio receiver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiverPdu {
    pub entity_id: EntityId,
    pub radio_id: u16,
    pub receiver_state: u16,
    pub received_power: f32,
    pub transmitter_entity_id: EntityId,
    pub transmitter_radio_id: u16,
}

impl ReceiverPdu {
    pub const CONTENT_LEN: usize = 24;

    pub fn content_length(&self) -> usize {
        Self::CONTENT_LEN
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> WireResult<Self> {
        let entity_id = EntityId::decode(cursor)?;
        let radio_id = cursor.read_u16()?;
        let receiver_state = cursor.read_u16()?;
        cursor.skip(2)?;
        let received_power = cursor.read_f32()?;
        let transmitter_entity_id = EntityId::decode(cursor)?;
        let transmitter_radio_id = cursor.read_u16()?;

        Ok(Self {
            entity_id,
            radio_id,
            receiver_state,
            received_power,
            transmitter_entity_id,
            transmitter_radio_id,
        })
    }

    pub fn encode(&self, cursor: &mut CursorMut<'_>) -> WireResult<()> {
        self.entity_id.encode(cursor)?;
        cursor.write_u16(self.radio_id)?;
        cursor.write_u16(self.receiver_state)?;
        cursor.write_padding(2)?;
        cursor.write_f32(self.received_power)?;
        self.transmitter_entity_id.encode(cursor)?;
        cursor.write_u16(self.transmitter_radio_id)
    }
}
