// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DIS Link Distributor
//!
//! Relays DIS PDU traffic between exercise networks: local broadcast or
//! multicast segments and point-to-point WAN peers, with anti-echo fan-out
//! and WAN bundling.
//!
//! # Quick Start
//!
//! ```bash
//! # Relay between a local exercise LAN and a WAN peer
//! disnet-distributor --config distributor.toml
//!
//! # Generate an example configuration
//! disnet-distributor gen-config --output distributor.toml
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! name = "site-alpha"
//!
//! [[links]]
//! kind = "dis"
//! name = "lan"
//! bind_port = 3000
//! destination = "192.168.1.255:3000"
//! exercise_id = 1
//!
//! [[links]]
//! kind = "wan"
//! name = "site-bravo"
//! bind_port = 4000
//! peer = "10.0.0.2:4000"
//! max_bundle_bytes = 1400
//! max_idle_ms = 100
//! ```

pub mod config;
pub mod distributor;
pub mod link;
pub mod reflector;

pub use config::{ConfigError, DisLinkConfig, DistributorConfig, LinkConfig, WanLinkConfig};
pub use distributor::{Distributor, DistributorError};
pub use link::{DisLink, Link, WanLink};
pub use reflector::{Message, Reflector, ReflectorStatsSnapshot};
