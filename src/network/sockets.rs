//! Host sockets library backed by [`std::net::UdpSocket`].
//!
//! Stands in for the modem's sockets wrapper when the demos run on a
//! workstation. Status codes follow the wrapper's conventions: zero or a
//! byte count on success, a negative code on failure, and a receive timeout
//! reported as zero bytes rather than an error.

use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use super::{SocketStatus, Sockets};

/// Generic socket failure.
pub const SOCKETS_SOCKET_ERROR: SocketStatus = -1;
/// Host name did not resolve to any address.
pub const SOCKETS_EHOSTUNREACH: SocketStatus = -2;
/// Invalid argument passed to the operating system.
pub const SOCKETS_EINVAL: SocketStatus = -3;
/// Peer refused the datagram (ICMP port unreachable).
pub const SOCKETS_ECONNREFUSED: SocketStatus = -4;

/// The host's UDP sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSockets;

fn timeout(ms: u32) -> Option<Duration> {
    // Zero means "block forever", which std spells `None`.
    (ms != 0).then(|| Duration::from_millis(u64::from(ms)))
}

fn status_of(kind: ErrorKind) -> SocketStatus {
    match kind {
        ErrorKind::InvalidInput => SOCKETS_EINVAL,
        ErrorKind::ConnectionRefused => SOCKETS_ECONNREFUSED,
        _ => SOCKETS_SOCKET_ERROR,
    }
}

fn local_for(remote: &SocketAddr) -> SocketAddr {
    match remote {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

impl Sockets for StdSockets {
    type Socket = UdpSocket;

    fn udp_connect(
        &mut self,
        host_name: &str,
        port: u16,
        receive_timeout_ms: u32,
        send_timeout_ms: u32,
    ) -> Result<Self::Socket, SocketStatus> {
        let remote = (host_name, port)
            .to_socket_addrs()
            .map_err(|_| SOCKETS_EHOSTUNREACH)?
            .next()
            .ok_or(SOCKETS_EHOSTUNREACH)?;

        let socket = UdpSocket::bind(local_for(&remote)).map_err(|e| status_of(e.kind()))?;
        socket.connect(remote).map_err(|e| status_of(e.kind()))?;
        socket
            .set_read_timeout(timeout(receive_timeout_ms))
            .map_err(|e| status_of(e.kind()))?;
        socket
            .set_write_timeout(timeout(send_timeout_ms))
            .map_err(|e| status_of(e.kind()))?;
        Ok(socket)
    }

    fn disconnect(&mut self, socket: Self::Socket) {
        drop(socket);
    }

    fn send(&mut self, socket: &mut Self::Socket, buf: &[u8]) -> Result<usize, SocketStatus> {
        match socket.send(buf) {
            Ok(sent) => Ok(sent),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) => Err(status_of(e.kind())),
        }
    }

    fn recv(
        &mut self,
        socket: &mut Self::Socket,
        buf: &mut [u8],
    ) -> Result<usize, SocketStatus> {
        match socket.recv(buf) {
            Ok(received) => Ok(received),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) => Err(status_of(e.kind())),
        }
    }
}
