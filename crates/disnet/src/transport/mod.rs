// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Network transport for DIS traffic.
//!
//! One PDU per datagram, no fragmentation. Each open connection owns one
//! receive thread; inbound bytes are handed to a [`BytesReceiver`] callback.

pub mod udp;

use std::sync::atomic::{AtomicU64, Ordering};

/// Callback handed each inbound datagram by a connection's receive thread.
///
/// Implementations must not block the receive thread and must swallow (log,
/// count) malformed input rather than panic: one bad packet must never kill
/// the receive loop.
pub trait BytesReceiver: Send + Sync {
    fn receive(&self, data: &[u8]);
}

/// Per-connection traffic counters.
///
/// Send counters are written by the caller of `send`, receive counters by
/// the receive thread; cross-thread reads go through [`snapshot`]. Relaxed
/// ordering is enough, the counters carry no synchronization duty.
///
/// [`snapshot`]: ConnectionMetrics::snapshot
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    pdus_sent: AtomicU64,
    pdus_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    pdus_discarded: AtomicU64,
}

impl ConnectionMetrics {
    pub fn record_send(&self, bytes: usize) {
        self.pdus_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_receive(&self, bytes: usize) {
        self.pdus_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_discard(&self) {
        self.pdus_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pdus_sent: self.pdus_sent.load(Ordering::Relaxed),
            pdus_received: self.pdus_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            pdus_discarded: self.pdus_discarded.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a connection's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pdus_sent: u64,
    pub pdus_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub pdus_discarded: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tx {} pdus/{} B, rx {} pdus/{} B, discarded {}",
            self.pdus_sent, self.bytes_sent, self.pdus_received, self.bytes_received,
            self.pdus_discarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_reflects_updates() {
        let metrics = ConnectionMetrics::default();
        metrics.record_send(144);
        metrics.record_send(96);
        metrics.record_receive(96);
        metrics.record_discard();

        let snap = metrics.snapshot();
        assert_eq!(snap.pdus_sent, 2);
        assert_eq!(snap.bytes_sent, 240);
        assert_eq!(snap.pdus_received, 1);
        assert_eq!(snap.bytes_received, 96);
        assert_eq!(snap.pdus_discarded, 1);
    }

    #[test]
    fn test_snapshot_display() {
        let snap = MetricsSnapshot { pdus_sent: 2, bytes_sent: 240, ..Default::default() };
        assert_eq!(snap.to_string(), "tx 2 pdus/240 B, rx 0 pdus/0 B, discarded 0");
    }
}
