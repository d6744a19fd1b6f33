// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The distributor: a fixed link table plus the Reflector that relays
//! between its members.

use std::sync::Arc;

use thiserror::Error;

use disnet::wire::WireError;

use crate::config::{ConfigError, DistributorConfig, LinkConfig};
use crate::link::{DisLink, Link, WanLink};
use crate::reflector::{Reflector, ReflectorStatsSnapshot};

/// Distributor errors.
#[derive(Debug, Error)]
pub enum DistributorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] WireError),
}

/// Relays PDUs between a fixed set of named links.
///
/// The link table is built once from configuration; links come up and down
/// individually but are never added or removed at runtime.
pub struct Distributor {
    name: String,
    links: Vec<Arc<dyn Link>>,
    reflector: Reflector,
}

impl Distributor {
    pub fn new(config: DistributorConfig) -> Result<Self, DistributorError> {
        config.validate()?;

        // Links need the enqueue handle before the worker captures the
        // finished link table, so the queue is created first.
        let mut reflector = Reflector::new();
        let sender = reflector.sender();

        let mut links: Vec<Arc<dyn Link>> = Vec::with_capacity(config.links.len());
        for link_config in &config.links {
            match link_config {
                LinkConfig::Dis(dis) => {
                    let destination = dis.destination_addr()?;
                    links.push(Arc::new(DisLink::new(dis.clone(), destination, sender.clone())));
                }
                LinkConfig::Wan(wan) => {
                    let peer = wan.peer_addr()?;
                    links.push(Arc::new(WanLink::new(wan.clone(), peer, sender.clone())));
                }
            }
        }

        reflector.start(links.clone())?;

        Ok(Self { name: config.name, links, reflector })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &[Arc<dyn Link>] {
        &self.links
    }

    /// Bring every configured link up. One link's failure never prevents
    /// the others from starting; returns how many came up.
    pub fn up_all(&self) -> usize {
        let mut up = 0;
        for link in &self.links {
            match link.up() {
                Ok(()) => up += 1,
                Err(err) => {
                    tracing::warn!(link = link.name(), "failed to bring link up: {}", err);
                }
            }
        }
        up
    }

    pub fn down_all(&self) {
        for link in &self.links {
            link.down();
        }
    }

    pub fn stats(&self) -> ReflectorStatsSnapshot {
        self.reflector.stats()
    }

    /// Per-link status lines for operational visibility.
    pub fn status(&self) -> Vec<String> {
        self.links.iter().map(|link| link.status()).collect()
    }

    /// Take every link down and stop the Reflector worker.
    pub fn shutdown(&mut self) {
        self.down_all();
        self.reflector.shutdown();
    }
}
