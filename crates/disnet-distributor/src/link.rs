// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concrete relay links.
//!
//! Each link owns its connection lifecycle (`Down -> Up -> Down`,
//! re-openable) and decides how "reflect this PDU" becomes bytes on its
//! wire: a DIS link sends one PDU per datagram, a WAN link bundles several
//! PDUs into one datagram within a size/idle budget. Ingress decode happens
//! on the link's receive thread, so the Reflector only ever sees complete
//! PDUs.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use crossbeam::channel::{self, RecvTimeoutError, Sender};

use disnet::protocol::{decode_bundle, decode_pdu, encode_pdu};
use disnet::transport::udp::UdpConnection;
use disnet::transport::BytesReceiver;

use crate::config::{DisLinkConfig, WanLinkConfig};
use crate::reflector::{Message, MessageSender};

/// A relay endpoint the Reflector fans out to.
///
/// `reflect` is called from the single Reflector thread and must not block
/// it; implementations that do real wire I/O offload anything slow.
pub trait Link: Send + Sync {
    fn name(&self) -> &str;

    /// Bring the link up. Errors leave it Down; other links are unaffected.
    fn up(&self) -> io::Result<()>;

    /// Take the link down, releasing its sockets and threads. Idempotent.
    fn down(&self);

    fn is_up(&self) -> bool;

    /// Send one relayed PDU out this link's wire.
    fn reflect(&self, message: &Message) -> io::Result<()>;

    /// One-line configuration summary.
    fn describe(&self) -> String;

    /// One-line operational status, including traffic counters.
    fn status(&self) -> String;
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> io::Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, format!("{} lock poisoned", what)))
}

/// Decodes single-PDU datagrams off a DIS link and enqueues them.
struct DisIngress {
    link: Arc<str>,
    reflector: MessageSender,
}

impl BytesReceiver for DisIngress {
    fn receive(&self, data: &[u8]) {
        match decode_pdu(data) {
            Ok(mut pdu) => {
                pdu.received = Some(SystemTime::now());
                self.reflector.send(Message { source: Arc::clone(&self.link), pdu });
            }
            Err(err) => {
                tracing::debug!(link = self.link.as_ref(), "dropping malformed PDU: {}", err);
            }
        }
    }
}

/// A local DIS exercise network: one PDU per datagram, exercise filtering
/// and loopback suppression handled by the transport.
pub struct DisLink {
    config: DisLinkConfig,
    destination: SocketAddr,
    reflector: MessageSender,
    conn: Mutex<Option<UdpConnection>>,
}

impl DisLink {
    pub fn new(
        config: DisLinkConfig,
        destination: SocketAddr,
        reflector: MessageSender,
    ) -> Self {
        Self { config, destination, reflector, conn: Mutex::new(None) }
    }
}

impl Link for DisLink {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn up(&self) -> io::Result<()> {
        let mut guard = lock(&self.conn, "dis link")?;
        if guard.is_some() {
            return Ok(());
        }

        let mut conn = UdpConnection::new(self.config.name.clone());
        conn.set_receiver(Arc::new(DisIngress {
            link: Arc::from(self.config.name.as_str()),
            reflector: self.reflector.clone(),
        }));
        conn.configure(self.destination, self.config.bind_port, self.config.exercise_id)?;
        conn.open()?;

        tracing::info!(link = self.config.name, "dis link up: {}", self.describe());
        *guard = Some(conn);
        Ok(())
    }

    fn down(&self) {
        let conn = match lock(&self.conn, "dis link") {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(mut conn) = conn {
            conn.close();
            tracing::info!(link = self.config.name, "dis link down");
        }
    }

    fn is_up(&self) -> bool {
        lock(&self.conn, "dis link").map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn reflect(&self, message: &Message) -> io::Result<()> {
        let guard = lock(&self.conn, "dis link")?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "link is down"))?;
        conn.send(&message.pdu)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "dis '{}': :{} -> {} (exercise {})",
            self.config.name, self.config.bind_port, self.destination, self.config.exercise_id
        )
    }

    fn status(&self) -> String {
        match lock(&self.conn, "dis link").ok().and_then(|guard| {
            guard.as_ref().map(|conn| conn.metrics_snapshot())
        }) {
            Some(snap) => format!("{} up, {}", self.describe(), snap),
            None => format!("{} down", self.describe()),
        }
    }
}

/// Decodes bundled datagrams off a WAN link and enqueues each PDU.
struct WanIngress {
    link: Arc<str>,
    reflector: MessageSender,
}

impl BytesReceiver for WanIngress {
    fn receive(&self, data: &[u8]) {
        match decode_bundle(data) {
            Ok(pdus) => {
                let received = Some(SystemTime::now());
                for mut pdu in pdus {
                    pdu.received = received;
                    self.reflector.send(Message { source: Arc::clone(&self.link), pdu });
                }
            }
            Err(err) => {
                tracing::debug!(link = self.link.as_ref(), "dropping malformed bundle: {}", err);
            }
        }
    }
}

struct WanActive {
    bundle_tx: Sender<Vec<u8>>,
    bundler: JoinHandle<()>,
}

/// A point-to-point WAN relay peer.
///
/// Outbound PDUs are queued to a bundler thread that packs them into one
/// datagram, flushing before the bundle would exceed `max_bundle_bytes` or
/// after `max_idle_ms` without a new PDU.
pub struct WanLink {
    config: WanLinkConfig,
    peer: SocketAddr,
    reflector: MessageSender,
    conn: Arc<Mutex<Option<UdpConnection>>>,
    active: Mutex<Option<WanActive>>,
}

impl WanLink {
    pub fn new(config: WanLinkConfig, peer: SocketAddr, reflector: MessageSender) -> Self {
        Self {
            config,
            peer,
            reflector,
            conn: Arc::new(Mutex::new(None)),
            active: Mutex::new(None),
        }
    }
}

impl Link for WanLink {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn up(&self) -> io::Result<()> {
        let mut active_guard = lock(&self.active, "wan link")?;
        if active_guard.is_some() {
            return Ok(());
        }

        let mut conn = UdpConnection::new(self.config.name.clone());
        conn.set_receiver(Arc::new(WanIngress {
            link: Arc::from(self.config.name.as_str()),
            reflector: self.reflector.clone(),
        }));
        // WAN traffic is already peer-filtered; no exercise filter here.
        conn.configure(self.peer, self.config.bind_port, 0)?;
        conn.open()?;
        *lock(&self.conn, "wan link")? = Some(conn);

        let (bundle_tx, bundle_rx) = channel::unbounded::<Vec<u8>>();
        let bundler_conn = Arc::clone(&self.conn);
        let name = self.config.name.clone();
        let max_bytes = self.config.max_bundle_bytes;
        let idle = Duration::from_millis(self.config.max_idle_ms);

        let bundler = std::thread::Builder::new()
            .name(format!("disnet-bundle-{}", self.config.name))
            .spawn(move || {
                let mut bundle: Vec<u8> = Vec::with_capacity(max_bytes);
                loop {
                    match bundle_rx.recv_timeout(idle) {
                        Ok(bytes) => {
                            if !bundle.is_empty() && bundle.len() + bytes.len() > max_bytes {
                                flush_bundle(&name, &bundler_conn, &mut bundle);
                            }
                            bundle.extend_from_slice(&bytes);
                            if bundle.len() >= max_bytes {
                                flush_bundle(&name, &bundler_conn, &mut bundle);
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            flush_bundle(&name, &bundler_conn, &mut bundle);
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            flush_bundle(&name, &bundler_conn, &mut bundle);
                            break;
                        }
                    }
                }
            })?;

        tracing::info!(link = self.config.name, "wan link up: {}", self.describe());
        *active_guard = Some(WanActive { bundle_tx, bundler });
        Ok(())
    }

    fn down(&self) {
        let active = match lock(&self.active, "wan link") {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(active) = active {
            // Dropping the sender disconnects the bundler, which flushes
            // the tail bundle and exits.
            drop(active.bundle_tx);
            if active.bundler.join().is_err() {
                tracing::warn!(link = self.config.name, "bundler thread panicked");
            }
            if let Ok(mut guard) = lock(&self.conn, "wan link") {
                if let Some(mut conn) = guard.take() {
                    conn.close();
                }
            }
            tracing::info!(link = self.config.name, "wan link down");
        }
    }

    fn is_up(&self) -> bool {
        lock(&self.active, "wan link").map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn reflect(&self, message: &Message) -> io::Result<()> {
        let bytes = encode_pdu(&message.pdu)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let guard = lock(&self.active, "wan link")?;
        let active = guard
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "link is down"))?;
        active
            .bundle_tx
            .send(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "bundler stopped"))
    }

    fn describe(&self) -> String {
        format!(
            "wan '{}': :{} -> {} (bundle {} B / {} ms)",
            self.config.name,
            self.config.bind_port,
            self.peer,
            self.config.max_bundle_bytes,
            self.config.max_idle_ms
        )
    }

    fn status(&self) -> String {
        let snap = lock(&self.conn, "wan link")
            .ok()
            .and_then(|guard| guard.as_ref().map(|conn| conn.metrics_snapshot()));
        match snap {
            Some(snap) if self.is_up() => format!("{} up, {}", self.describe(), snap),
            _ => format!("{} down", self.describe()),
        }
    }
}

fn flush_bundle(name: &str, conn: &Mutex<Option<UdpConnection>>, bundle: &mut Vec<u8>) {
    if bundle.is_empty() {
        return;
    }
    match conn.lock() {
        Ok(guard) => {
            if let Some(conn) = guard.as_ref() {
                if let Err(err) = conn.send_bytes(bundle) {
                    tracing::warn!(link = name, "bundle send failed: {}", err);
                }
            }
        }
        Err(_) => tracing::warn!(link = name, "connection lock poisoned, dropping bundle"),
    }
    bundle.clear();
}
