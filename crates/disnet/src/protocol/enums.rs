// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DIS enumerated fields.
//!
//! Two decode policies exist in IEEE 1278.1 practice and both are preserved
//! here. Lenient enumerations carry unrecognized wire values through an
//! `Other(raw)` variant so they round-trip unchanged; strict enumerations
//! reject anything outside their table with `UnknownEnumerant`.

use crate::wire::{WireError, WireResult};

/// Generate a lenient enumeration (eliminates code duplication)
///
/// Unknown raw values map to `Other(raw)`; known values that also have an
/// "Other" meaning in the DIS tables simply land in `Other` with their raw
/// value preserved, so encode emits the exact byte that was decoded.
macro_rules! lenient_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(u8),
        }

        impl $name {
            pub fn from_raw(raw: u8) -> Self {
                match raw {
                    $($value => Self::$variant,)+
                    other => Self::Other(other),
                }
            }

            pub fn raw(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(raw) => raw,
                }
            }
        }
    };
}

/// Generate a strict enumeration (eliminates code duplication)
///
/// Decoding a value outside the table fails with `UnknownEnumerant` naming
/// the field.
macro_rules! strict_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn from_raw(raw: u8) -> WireResult<Self> {
                match raw {
                    $($value => Ok(Self::$variant),)+
                    other => Err(WireError::UnknownEnumerant {
                        field: stringify!($name),
                        value: u32::from(other),
                    }),
                }
            }

            pub fn raw(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }
    };
}

lenient_enum! {
    /// DIS protocol version (header byte 0).
    ProtocolVersion {
        Dis5 = 5,
        Dis6 = 6,
        Dis7 = 7,
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        ProtocolVersion::Dis6
    }
}

lenient_enum! {
    /// Protocol family (header byte 3), groups PDU kinds.
    ProtocolFamily {
        EntityInformation = 1,
        Warfare = 2,
        Logistics = 3,
        RadioCommunications = 4,
        SimulationManagement = 5,
        DistributedEmissionRegeneration = 6,
    }
}

lenient_enum! {
    /// Force the entity belongs to. Raw 0 is the DIS "Other" force.
    ForceId {
        Friendly = 1,
        Opposing = 2,
        Neutral = 3,
    }
}

impl Default for ForceId {
    fn default() -> Self {
        // Raw 0 is the DIS "Other" force.
        ForceId::Other(0)
    }
}

lenient_enum! {
    /// Camouflage appearance. Raw 3 is the DIS "Other" camouflage; anything
    /// above the table falls through the same way.
    CamouflageType {
        Desert = 0,
        Winter = 1,
        Forest = 2,
    }
}

lenient_enum! {
    /// Radio transmit state.
    TransmitState {
        Off = 0,
        OnNotTransmitting = 1,
        OnTransmitting = 2,
    }
}

lenient_enum! {
    /// Outcome of a detonation. Raw 0 is the DIS "Other" result.
    DetonationResult {
        EntityImpact = 1,
        EntityProximateDetonation = 2,
        GroundImpact = 3,
        GroundProximateDetonation = 4,
        Detonation = 5,
        None = 6,
    }
}

impl Default for DetonationResult {
    fn default() -> Self {
        // Raw 0 is the DIS "Other" result.
        DetonationResult::Other(0)
    }
}

strict_enum! {
    /// Damage appearance. Strict per the source DIS implementation: an
    /// unmapped value fails decode instead of degrading to a sentinel.
    DamageState {
        NoDamage = 0,
        SlightDamage = 1,
        ModerateDamage = 2,
        Destroyed = 3,
    }
}

strict_enum! {
    /// Lifeform posture. Strict, matching the source's policy for this field.
    LifeformState {
        UprightStandingStill = 1,
        UprightWalking = 2,
        UprightRunning = 3,
        Kneeling = 4,
        Prone = 5,
        Crawling = 6,
        Swimming = 7,
        Parachuting = 8,
        Jumping = 9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_enum_falls_back_to_other() {
        assert_eq!(CamouflageType::from_raw(0), CamouflageType::Desert);
        assert_eq!(CamouflageType::from_raw(2), CamouflageType::Forest);
        // Out-of-table value degrades to Other and round-trips exactly.
        assert_eq!(CamouflageType::from_raw(4), CamouflageType::Other(4));
        assert_eq!(CamouflageType::from_raw(4).raw(), 4);
    }

    #[test]
    fn test_lenient_enum_preserves_defined_other() {
        // Raw 0 is the DIS "Other" force; it must re-encode as 0, not as
        // some canonicalized sentinel.
        assert_eq!(ForceId::from_raw(0), ForceId::Other(0));
        assert_eq!(ForceId::from_raw(0).raw(), 0);
        assert_eq!(ForceId::from_raw(1), ForceId::Friendly);
    }

    #[test]
    fn test_strict_enum_rejects_unknown_value() {
        assert_eq!(DamageState::from_raw(2).expect("in table"), DamageState::ModerateDamage);

        let err = DamageState::from_raw(9).unwrap_err();
        assert_eq!(err, WireError::UnknownEnumerant { field: "DamageState", value: 9 });
    }

    #[test]
    fn test_lifeform_state_strict_policy() {
        assert_eq!(LifeformState::from_raw(5).expect("in table"), LifeformState::Prone);
        assert!(LifeformState::from_raw(0).is_err());
        assert!(LifeformState::from_raw(42).is_err());
    }

    #[test]
    fn test_protocol_version_roundtrip() {
        for raw in 0..=u8::MAX {
            assert_eq!(ProtocolVersion::from_raw(raw).raw(), raw);
            assert_eq!(ProtocolFamily::from_raw(raw).raw(), raw);
        }
    }
}
