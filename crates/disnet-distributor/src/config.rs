// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Distributor configuration.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use disnet::config::MAX_DATAGRAM;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Distributor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorConfig {
    /// Distributor name (for identification).
    #[serde(default = "default_name")]
    pub name: String,

    /// Links to relay between.
    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// Statistics reporting interval (seconds, 0 to disable).
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_name() -> String {
    "disnet-distributor".to_string()
}

fn default_stats_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_bundle_bytes() -> usize {
    1400
}

fn default_max_idle_ms() -> u64 {
    100
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            links: Vec::new(),
            stats_interval_secs: default_stats_interval(),
            log_level: default_log_level(),
        }
    }
}

impl DistributorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Add a link.
    pub fn add_link(&mut self, link: LinkConfig) {
        self.links.push(link);
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.len() < 2 {
            return Err(ConfigError::Invalid(
                "A distributor needs at least two links to relay between".into(),
            ));
        }

        let mut names = HashSet::new();
        for link in &self.links {
            let name = link.name();
            if name.is_empty() {
                return Err(ConfigError::Invalid("Link with empty name".into()));
            }
            if !names.insert(name) {
                return Err(ConfigError::Invalid(format!("Duplicate link name '{}'", name)));
            }

            match link {
                LinkConfig::Dis(dis) => {
                    parse_addr(&dis.destination, name)?;
                }
                LinkConfig::Wan(wan) => {
                    parse_addr(&wan.peer, name)?;
                    if wan.max_bundle_bytes > MAX_DATAGRAM {
                        return Err(ConfigError::Invalid(format!(
                            "Link '{}' max_bundle_bytes {} exceeds the {} byte datagram limit",
                            name, wan.max_bundle_bytes, MAX_DATAGRAM
                        )));
                    }
                    if wan.max_bundle_bytes < 64 {
                        return Err(ConfigError::Invalid(format!(
                            "Link '{}' max_bundle_bytes {} cannot hold a single PDU",
                            name, wan.max_bundle_bytes
                        )));
                    }
                    if wan.max_idle_ms == 0 {
                        return Err(ConfigError::Invalid(format!(
                            "Link '{}' max_idle_ms must be nonzero",
                            name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn parse_addr(text: &str, link: &str) -> Result<SocketAddr, ConfigError> {
    text.parse().map_err(|_| {
        ConfigError::Invalid(format!("Link '{}' has unparseable address '{}'", link, text))
    })
}

/// Configuration for a single link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LinkConfig {
    /// A local DIS exercise network (broadcast/multicast/unicast UDP).
    Dis(DisLinkConfig),
    /// A point-to-point WAN relay peer with PDU bundling.
    Wan(WanLinkConfig),
}

impl LinkConfig {
    pub fn name(&self) -> &str {
        match self {
            LinkConfig::Dis(dis) => &dis.name,
            LinkConfig::Wan(wan) => &wan.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisLinkConfig {
    pub name: String,

    /// Local UDP port the link listens on.
    pub bind_port: u16,

    /// Where outbound PDUs go ("host:port"; broadcast and multicast
    /// addresses are detected from the address itself).
    pub destination: String,

    /// Exercise id filter for inbound traffic (0 accepts any).
    #[serde(default)]
    pub exercise_id: u8,
}

impl DisLinkConfig {
    pub fn new(name: impl Into<String>, bind_port: u16, destination: impl Into<String>) -> Self {
        Self { name: name.into(), bind_port, destination: destination.into(), exercise_id: 0 }
    }

    pub fn exercise(mut self, exercise_id: u8) -> Self {
        self.exercise_id = exercise_id;
        self
    }

    /// Parsed destination. Call after `validate`.
    pub fn destination_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr(&self.destination, &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WanLinkConfig {
    pub name: String,

    /// Local UDP port the link listens on.
    pub bind_port: u16,

    /// Remote distributor this link relays to ("host:port").
    pub peer: String,

    /// Flush the outbound bundle before it would exceed this size.
    #[serde(default = "default_max_bundle_bytes")]
    pub max_bundle_bytes: usize,

    /// Flush the outbound bundle after this long without a new PDU.
    #[serde(default = "default_max_idle_ms")]
    pub max_idle_ms: u64,
}

impl WanLinkConfig {
    pub fn new(name: impl Into<String>, bind_port: u16, peer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_port,
            peer: peer.into(),
            max_bundle_bytes: default_max_bundle_bytes(),
            max_idle_ms: default_max_idle_ms(),
        }
    }

    pub fn bundle(mut self, max_bundle_bytes: usize, max_idle_ms: u64) -> Self {
        self.max_bundle_bytes = max_bundle_bytes;
        self.max_idle_ms = max_idle_ms;
        self
    }

    /// Parsed peer address. Call after `validate`.
    pub fn peer_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr(&self.peer, &self.name)
    }
}
