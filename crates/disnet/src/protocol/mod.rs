// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The DIS PDU codec: header, records, enumerations, and typed bodies.

pub mod emissions;
pub mod enums;
pub mod header;
pub mod pdu;
pub mod records;

pub use header::{PduHeader, PduType};
pub use pdu::{decode_bundle, decode_pdu, encode_pdu, Pdu, PduBody};
