// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The central fan-out engine.
//!
//! Every link enqueues decoded PDUs here; exactly one worker thread drains
//! the queue and fans each message out to every Up link except the one it
//! arrived on. That single consumer is the only place the link table is
//! iterated, so no cross-link locking exists on the relay path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Sender};

use disnet::protocol::Pdu;

use crate::link::Link;

/// One relayed PDU plus the name of the link it arrived on.
#[derive(Debug, Clone)]
pub struct Message {
    pub source: Arc<str>,
    pub pdu: Pdu,
}

enum Command {
    Relay(Message),
    Shutdown,
}

/// Relay counters, updated only by the worker thread.
#[derive(Debug, Default)]
pub struct ReflectorStats {
    messages: AtomicU64,
    deliveries: AtomicU64,
    delivery_failures: AtomicU64,
}

impl ReflectorStats {
    pub fn snapshot(&self) -> ReflectorStatsSnapshot {
        ReflectorStatsSnapshot {
            messages: self.messages.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the relay counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflectorStatsSnapshot {
    pub messages: u64,
    pub deliveries: u64,
    pub delivery_failures: u64,
}

pub struct Reflector {
    tx: Sender<Command>,
    rx: Option<channel::Receiver<Command>>,
    worker: Option<JoinHandle<()>>,
    stats: Arc<ReflectorStats>,
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new()
    }
}

impl Reflector {
    /// Create the queue without a worker. Links take [`sender`] handles
    /// first; [`start`] then captures the finished link table.
    ///
    /// [`sender`]: Reflector::sender
    /// [`start`]: Reflector::start
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx: Some(rx), worker: None, stats: Arc::new(ReflectorStats::default()) }
    }

    /// Spawn the worker over a fixed link table.
    ///
    /// The table is captured once; links flip their own Up/Down state, the
    /// worker only reads `is_up` per delivery.
    pub fn start(&mut self, links: Vec<Arc<dyn Link>>) -> std::io::Result<()> {
        let rx = self.rx.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "reflector already started")
        })?;
        let worker_stats = Arc::clone(&self.stats);

        let worker = std::thread::Builder::new()
            .name("disnet-reflector".to_string())
            .spawn(move || {
                while let Ok(command) = rx.recv() {
                    match command {
                        Command::Relay(message) => {
                            worker_stats.messages.fetch_add(1, Ordering::Relaxed);
                            fan_out(&links, &message, &worker_stats);
                        }
                        Command::Shutdown => break,
                    }
                }
            })?;

        self.worker = Some(worker);
        Ok(())
    }

    /// Create and start in one step.
    pub fn spawn(links: Vec<Arc<dyn Link>>) -> std::io::Result<Self> {
        let mut reflector = Self::new();
        reflector.start(links)?;
        Ok(reflector)
    }

    /// Handle links use to enqueue inbound messages. Enqueueing never
    /// blocks; the queue is unbounded.
    pub fn sender(&self) -> MessageSender {
        MessageSender { tx: self.tx.clone() }
    }

    pub fn stats(&self) -> ReflectorStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the worker and join it. Messages still queued behind the
    /// shutdown command are dropped.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.tx.send(Command::Shutdown);
            if worker.join().is_err() {
                tracing::warn!("reflector worker panicked");
            }
        }
    }
}

impl Drop for Reflector {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable enqueue-only handle held by link ingress paths.
#[derive(Clone)]
pub struct MessageSender {
    tx: Sender<Command>,
}

impl MessageSender {
    pub fn send(&self, message: Message) {
        // Fails only after shutdown; late packets are simply dropped.
        let _ = self.tx.send(Command::Relay(message));
    }
}

fn fan_out(links: &[Arc<dyn Link>], message: &Message, stats: &ReflectorStats) {
    for link in links {
        // A PDU never goes back out the link it arrived on.
        if link.name() == message.source.as_ref() {
            continue;
        }
        if !link.is_up() {
            continue;
        }
        match link.reflect(message) {
            Ok(()) => {
                stats.deliveries.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                stats.delivery_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(link = link.name(), "reflect failed: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use std::time::Duration;

    use disnet::protocol::pdu::FirePdu;
    use disnet::protocol::{Pdu, PduBody};

    struct MockLink {
        name: String,
        up: AtomicBool,
        delivered: Mutex<Vec<Arc<str>>>,
    }

    impl MockLink {
        fn new(name: &str, up: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                up: AtomicBool::new(up),
                delivered: Mutex::new(Vec::new()),
            })
        }

        fn delivery_count(&self) -> usize {
            self.delivered.lock().map(|d| d.len()).unwrap_or(0)
        }
    }

    impl Link for MockLink {
        fn name(&self) -> &str {
            &self.name
        }

        fn up(&self) -> std::io::Result<()> {
            self.up.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn down(&self) {
            self.up.store(false, Ordering::SeqCst);
        }

        fn is_up(&self) -> bool {
            self.up.load(Ordering::SeqCst)
        }

        fn reflect(&self, message: &Message) -> std::io::Result<()> {
            self.delivered
                .lock()
                .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "poisoned"))?
                .push(Arc::clone(&message.source));
            Ok(())
        }

        fn describe(&self) -> String {
            format!("mock link '{}'", self.name)
        }

        fn status(&self) -> String {
            format!("mock link '{}' up={}", self.name, self.is_up())
        }
    }

    fn fire_message(source: &str) -> Message {
        Message {
            source: Arc::from(source),
            pdu: Pdu::new(PduBody::Fire(FirePdu::default()), 1),
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(std::time::Instant::now() < deadline, "condition never met");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_anti_echo_fan_out() {
        let a = MockLink::new("a", true);
        let b = MockLink::new("b", true);
        let c = MockLink::new("c", true);
        let links: Vec<Arc<dyn Link>> =
            vec![Arc::clone(&a) as _, Arc::clone(&b) as _, Arc::clone(&c) as _];

        let mut reflector = Reflector::spawn(links).expect("spawn");
        reflector.sender().send(fire_message("a"));

        wait_for(|| b.delivery_count() == 1 && c.delivery_count() == 1);
        // Never back to the source, no matter how long we wait.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(a.delivery_count(), 0);
        assert_eq!(b.delivery_count(), 1);
        assert_eq!(c.delivery_count(), 1);

        let stats = reflector.stats();
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.deliveries, 2);
        assert_eq!(stats.delivery_failures, 0);

        reflector.shutdown();
    }

    #[test]
    fn test_down_links_are_skipped() {
        let a = MockLink::new("a", true);
        let b = MockLink::new("b", false);
        let links: Vec<Arc<dyn Link>> = vec![Arc::clone(&a) as _, Arc::clone(&b) as _];

        let mut reflector = Reflector::spawn(links).expect("spawn");
        reflector.sender().send(fire_message("a"));
        reflector.sender().send(fire_message("b"));

        wait_for(|| a.delivery_count() == 1);
        assert_eq!(b.delivery_count(), 0);

        reflector.shutdown();
    }

    #[test]
    fn test_shutdown_joins_worker() {
        let a = MockLink::new("a", true);
        let links: Vec<Arc<dyn Link>> = vec![Arc::clone(&a) as _];
        let mut reflector = Reflector::spawn(links).expect("spawn");

        let sender = reflector.sender();
        reflector.shutdown();
        // Enqueue after shutdown is a silent no-op.
        sender.send(fire_message("b"));
        assert_eq!(a.delivery_count(), 0);
    }
}
