//! A network abstraction layer for cellular demo applications
//!
//! This module provides the traits the demos are written against:
//!
//! - [`Read`], [`Write`], [`Close`] and [`Connection`]: generic byte-stream style
//!   access to an established transport
//! - [`TransportInterface`]: the send/receive pair handed to test harnesses
//! - [`Sockets`]: the seam to the sockets wrapper library that sits on top of the
//!   cellular modem driver
//!

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Transport implementations
pub mod transport;

/// Host sockets library backed by `std::net`
#[cfg(feature = "std")]
pub mod sockets;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connection, Read, Sockets, TransportInterface, Write};
}

/// Status code reported by a [`Sockets`] implementation.
///
/// Zero means success, negative values are library-specific error codes.
pub type SocketStatus = i32;

// Core synchronous traits
/// Read data from an established transport.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Write data to an established transport.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Tear down an established transport.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// The send/receive pair of a transport, as consumed by test harnesses and
/// application protocols.
///
/// Both calls block up to the timeouts configured at connect time. A receive
/// of `Ok(0)` means no data arrived within the timeout.
pub trait TransportInterface {
    /// Send `buf` to the connected peer, returning the number of bytes sent.
    fn send(&mut self, buf: &[u8]) -> Result<usize, error::Error>;
    /// Receive up to `buf.len()` bytes from the connected peer.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, error::Error>;
}

/// The sockets wrapper library underneath the UDP transport.
///
/// On target this wraps the cellular modem's socket API. All calls return the
/// library's raw [`SocketStatus`] on failure; translating those codes is the
/// transport's job.
pub trait Sockets {
    /// Handle of an open socket.
    type Socket;

    /// Open a UDP socket associated with `host_name:port`.
    fn udp_connect(
        &mut self,
        host_name: &str,
        port: u16,
        receive_timeout_ms: u32,
        send_timeout_ms: u32,
    ) -> Result<Self::Socket, SocketStatus>;

    /// Close a socket. Closing never fails from the caller's point of view.
    fn disconnect(&mut self, socket: Self::Socket);

    /// Send one datagram.
    fn send(&mut self, socket: &mut Self::Socket, buf: &[u8]) -> Result<usize, SocketStatus>;

    /// Receive one datagram, returning `Ok(0)` on timeout.
    fn recv(&mut self, socket: &mut Self::Socket, buf: &mut [u8])
    -> Result<usize, SocketStatus>;
}

impl<S: Sockets + ?Sized> Sockets for &mut S {
    type Socket = S::Socket;

    fn udp_connect(
        &mut self,
        host_name: &str,
        port: u16,
        receive_timeout_ms: u32,
        send_timeout_ms: u32,
    ) -> Result<Self::Socket, SocketStatus> {
        (**self).udp_connect(host_name, port, receive_timeout_ms, send_timeout_ms)
    }

    fn disconnect(&mut self, socket: Self::Socket) {
        (**self).disconnect(socket)
    }

    fn send(&mut self, socket: &mut Self::Socket, buf: &[u8]) -> Result<usize, SocketStatus> {
        (**self).send(socket, buf)
    }

    fn recv(
        &mut self,
        socket: &mut Self::Socket,
        buf: &mut [u8],
    ) -> Result<usize, SocketStatus> {
        (**self).recv(socket, buf)
    }
}
