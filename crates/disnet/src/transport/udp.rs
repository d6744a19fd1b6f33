// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP connection with a dedicated receive thread.
//!
//! A connection moves `Unconfigured -> Configured -> Open -> Closed` and
//! never reopens. `open` builds a socket pair: a receive socket bound to the
//! configured port (joining the group for multicast destinations) and an
//! ephemeral send socket, so self-traffic on broadcast media can be told
//! apart by source port plus a local interface address and suppressed.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::config::{EXERCISE_ANY, MAX_DATAGRAM};
use crate::protocol::{encode_pdu, Pdu};
use crate::transport::{BytesReceiver, ConnectionMetrics, MetricsSnapshot};

/// Upper bound on one blocking `recv_from`. The receive thread normally
/// leaves via the close-time wakeup datagram; the timeout guarantees the
/// stop flag is rechecked even if that datagram is lost.
const RECV_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconfigured,
    Configured,
    Open,
    /// Terminal. A closed connection is never reopened.
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct UdpParams {
    destination: SocketAddr,
    bind_port: u16,
    exercise_id: u8,
}

pub struct UdpConnection {
    name: String,
    state: ConnectionState,
    params: Option<UdpParams>,
    receiver: Option<Arc<dyn BytesReceiver>>,
    send_socket: Option<UdpSocket>,
    recv_addr: Option<SocketAddr>,
    recv_thread: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    metrics: Arc<ConnectionMetrics>,
}

impl UdpConnection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ConnectionState::Unconfigured,
            params: None,
            receiver: None,
            send_socket: None,
            recv_addr: None,
            recv_thread: None,
            stop: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(ConnectionMetrics::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Shared handle to this connection's counters, safe to read from any
    /// thread via [`ConnectionMetrics::snapshot`].
    pub fn metrics(&self) -> Arc<ConnectionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Local address of the receive socket once open. Useful when the
    /// configured bind port was 0 (ephemeral).
    pub fn recv_addr(&self) -> Option<SocketAddr> {
        self.recv_addr
    }

    /// Register the callback inbound datagrams are handed to. Must happen
    /// before `open`; the receive thread captures it once.
    pub fn set_receiver(&mut self, receiver: Arc<dyn BytesReceiver>) {
        self.receiver = Some(receiver);
    }

    /// Bind static parameters without touching the network.
    ///
    /// `exercise_id` filters inbound traffic; `EXERCISE_ANY` (0) accepts
    /// every exercise.
    pub fn configure(
        &mut self,
        destination: SocketAddr,
        bind_port: u16,
        exercise_id: u8,
    ) -> io::Result<()> {
        if self.state != ConnectionState::Unconfigured {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("connection '{}' already configured", self.name),
            ));
        }
        self.params = Some(UdpParams { destination, bind_port, exercise_id });
        self.state = ConnectionState::Configured;
        log::debug!(
            "[UDP] '{}' configured dest={} bind_port={} exercise={}",
            self.name,
            destination,
            bind_port,
            exercise_id
        );
        Ok(())
    }

    /// Open the socket pair and spawn the receive thread, returning
    /// immediately. Bind/setup failures are fatal and surface here.
    pub fn open(&mut self) -> io::Result<()> {
        if self.state != ConnectionState::Configured {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("connection '{}' is not in the configured state", self.name),
            ));
        }
        let params = self.params.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "configured without parameters")
        })?;

        let recv_socket = build_recv_socket(&params)?;
        let recv_addr = recv_socket.local_addr()?;

        let send_socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        if is_broadcast(params.destination.ip()) {
            send_socket.set_broadcast(true)?;
        }
        let send_addr = send_socket.local_addr()?;

        log::debug!(
            "[UDP] '{}' open recv={} send={} dest={}",
            self.name,
            recv_addr,
            send_addr,
            params.destination
        );

        let thread_socket = recv_socket.try_clone()?;
        let stop = Arc::clone(&self.stop);
        let metrics = Arc::clone(&self.metrics);
        let receiver = self.receiver.clone();
        let name = self.name.clone();
        let exercise_id = params.exercise_id;
        let local_ips = local_addresses();

        let handle = std::thread::Builder::new()
            .name(format!("disnet-recv-{}", self.name))
            .spawn(move || {
                receive_loop(
                    &name,
                    &thread_socket,
                    &stop,
                    &metrics,
                    receiver.as_deref(),
                    exercise_id,
                    send_addr.port(),
                    &local_ips,
                );
            })?;

        self.send_socket = Some(send_socket);
        self.recv_addr = Some(recv_addr);
        self.recv_thread = Some(handle);
        self.state = ConnectionState::Open;
        Ok(())
    }

    /// Serialize a PDU and send it as one datagram.
    pub fn send(&self, pdu: &Pdu) -> io::Result<usize> {
        let bytes = encode_pdu(pdu)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.send_bytes(&bytes)
    }

    /// Send pre-encoded bytes as one datagram.
    pub fn send_bytes(&self, bytes: &[u8]) -> io::Result<usize> {
        if self.state != ConnectionState::Open {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("connection '{}' is not open", self.name),
            ));
        }
        if bytes.len() > MAX_DATAGRAM {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} bytes exceed the {} byte datagram limit", bytes.len(), MAX_DATAGRAM),
            ));
        }
        let socket = self.send_socket.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "open without a send socket")
        })?;
        let params = self.params.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "open without parameters")
        })?;

        let sent = socket.send_to(bytes, params.destination)?;
        self.metrics.record_send(sent);
        Ok(sent)
    }

    /// Stop the receive thread and join it. Idempotent; the connection ends
    /// Closed either way.
    pub fn close(&mut self) {
        if self.state != ConnectionState::Open {
            self.state = ConnectionState::Closed;
            return;
        }
        self.stop.store(true, Ordering::Release);

        // recv_from blocks until a datagram arrives or the read timeout
        // fires, so a throwaway datagram to our own receive port wakes the
        // thread promptly; if it is lost, the timeout bounds the join.
        if let Some(recv_addr) = self.recv_addr {
            let wakeup = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), recv_addr.port());
            match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
                Ok(socket) => {
                    if let Err(err) = socket.send_to(&[0u8], wakeup) {
                        log::warn!("[UDP] '{}' wakeup send failed: {}", self.name, err);
                    }
                }
                Err(err) => log::warn!("[UDP] '{}' wakeup socket failed: {}", self.name, err),
            }
        }

        if let Some(handle) = self.recv_thread.take() {
            if handle.join().is_err() {
                log::warn!("[UDP] '{}' receive thread panicked", self.name);
            }
        }
        self.send_socket = None;
        self.state = ConnectionState::Closed;
        log::debug!("[UDP] '{}' closed", self.name);
    }
}

impl Drop for UdpConnection {
    fn drop(&mut self) {
        if self.state == ConnectionState::Open {
            self.close();
        }
    }
}

fn build_recv_socket(params: &UdpParams) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_read_timeout(Some(RECV_TIMEOUT))?;
    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), params.bind_port);
    socket.bind(&bind_addr.into())?;

    if let IpAddr::V4(dest) = params.destination.ip() {
        if dest.is_multicast() {
            socket.join_multicast_v4(&dest, &Ipv4Addr::UNSPECIFIED)?;
        }
    }
    Ok(socket.into())
}

fn is_broadcast(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_broadcast() || v4.octets()[3] == 255,
        IpAddr::V6(_) => false,
    }
}

/// Addresses of this host's interfaces, captured once at open time.
///
/// Discovery failure degrades loopback suppression to loopback sources only;
/// it never blocks opening the connection.
fn local_addresses() -> Vec<IpAddr> {
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => interfaces.into_iter().map(|(_, ip)| ip).collect(),
        Err(err) => {
            log::warn!("[UDP] interface discovery failed: {}", err);
            Vec::new()
        }
    }
}

/// True when a datagram's source is this connection's own send socket.
///
/// The send socket binds the wildcard address, so its bound IP says nothing;
/// self-traffic is a matching source port on an address this host owns. A
/// foreign host that happens to share the ephemeral port is not ours.
fn is_self_traffic(source: SocketAddr, send_port: u16, local_ips: &[IpAddr]) -> bool {
    source.port() == send_port
        && (source.ip().is_loopback() || local_ips.contains(&source.ip()))
}

#[allow(clippy::too_many_arguments)]
fn receive_loop(
    name: &str,
    socket: &UdpSocket,
    stop: &AtomicBool,
    metrics: &ConnectionMetrics,
    receiver: Option<&dyn BytesReceiver>,
    exercise_id: u8,
    send_port: u16,
    local_ips: &[IpAddr],
) {
    let mut buf = [0u8; MAX_DATAGRAM];
    loop {
        let (len, source) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err) => {
                if stop.load(Ordering::Acquire) {
                    break;
                }
                // An idle socket hits the read timeout; everything else is a
                // steady-state receive error and not fatal either.
                if !matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) {
                    log::warn!("[UDP] '{}' receive error: {}", name, err);
                }
                continue;
            }
        };
        if stop.load(Ordering::Acquire) {
            break;
        }

        if is_self_traffic(source, send_port, local_ips) {
            metrics.record_discard();
            continue;
        }

        // Header byte 1 is the exercise id; 0 on either side means any.
        // Runts too short to carry one fail a configured filter outright.
        if exercise_id != EXERCISE_ANY {
            let accept = len > 1 && (buf[1] == EXERCISE_ANY || buf[1] == exercise_id);
            if !accept {
                metrics.record_discard();
                continue;
            }
        }

        if let Some(receiver) = receiver {
            receiver.receive(&buf[..len]);
        }
        metrics.record_receive(len);
    }
    log::debug!("[UDP] '{}' receive loop stopped", name);
}
