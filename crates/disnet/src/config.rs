// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DIS wire and transport constants (IEEE 1278.1).
//!
//! Centralizes the protocol magic numbers so they are never hardcoded at a
//! call site.

/// Fixed PDU header length in bytes (every PDU starts with this).
pub const PDU_HEADER_LEN: usize = 12;

/// Character-set tag written ahead of fixed-width strings (1 = ASCII).
pub const ASCII_CHARSET: u8 = 1;

/// Width of the entity marking field (data bytes, excluding the charset tag).
pub const MARKING_LEN: usize = 11;

/// Largest datagram the transport will send: Ethernet MTU (1500) minus
/// IPv4 (20) and UDP (8) headers. One PDU per datagram, no fragmentation.
pub const MAX_DATAGRAM: usize = 1472;

/// Conventional DIS exercise port.
pub const DEFAULT_PORT: u16 = 3000;

/// Site/application/entity wildcard ("all") identifier value.
pub const ID_ALL: u16 = 0xFFFF;

/// "No entity" identifier value (same wire value as the wildcard; the
/// meaning depends on the field per IEEE 1278.1).
pub const ID_NONE: u16 = 0xFFFF;

/// Exercise id that accepts traffic from any exercise.
pub const EXERCISE_ANY: u8 = 0;

/// Alignment rule for trailing variable blobs (modulation parameters,
/// antenna patterns): lengths must fall on a 64-bit boundary.
pub const BLOB_ALIGNMENT: usize = 8;
