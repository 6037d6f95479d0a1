//! Plaintext UDP transport.
//!
//! A thin shim over a [`Sockets`] library: every call validates its arguments,
//! delegates to the library and translates the library's status code into the
//! transport [`Error`]. There is no framing, retransmission or buffering here;
//! each `send` is one datagram and each `recv` returns at most one datagram.
//!
//! # Example
//!
//! ```rust
//! use libcellular::network::transport::NetworkContext;
//! use libcellular::network::{Sockets, SocketStatus, TransportInterface};
//!
//! struct Loopback(heapless::Vec<u8, 64>);
//!
//! impl Sockets for Loopback {
//!     type Socket = ();
//!     fn udp_connect(&mut self, _: &str, _: u16, _: u32, _: u32) -> Result<(), SocketStatus> {
//!         Ok(())
//!     }
//!     fn disconnect(&mut self, _: ()) {}
//!     fn send(&mut self, _: &mut (), buf: &[u8]) -> Result<usize, SocketStatus> {
//!         self.0.clear();
//!         self.0.extend_from_slice(buf).map_err(|_| -1)?;
//!         Ok(buf.len())
//!     }
//!     fn recv(&mut self, _: &mut (), buf: &mut [u8]) -> Result<usize, SocketStatus> {
//!         let n = self.0.len().min(buf.len());
//!         buf[..n].copy_from_slice(&self.0[..n]);
//!         Ok(n)
//!     }
//! }
//!
//! let mut context = NetworkContext::new(Loopback(heapless::Vec::new()));
//! context.connect("echo.example.com", 9000, 5000, 5000).unwrap();
//! assert_eq!(context.send(b"ping").unwrap(), 4);
//! let mut buf = [0u8; 4];
//! assert_eq!(context.recv(&mut buf).unwrap(), 4);
//! context.disconnect().unwrap();
//! ```

use core::fmt;

use heapless::String;

use crate::network::error::Error;
use crate::network::{Close, Connection, Read, Sockets, TransportInterface, Write};

/// Longest host name accepted by [`NetworkContext::connect`] (the DNS limit).
pub const MAX_HOST_NAME_LEN: usize = 253;

/// Per-connection bookkeeping kept next to the socket handle.
struct PlaintextTransportParams<T> {
    socket: Option<T>,
    host_name: String<MAX_HOST_NAME_LEN>,
    port: u16,
    bytes_sent: u64,
    bytes_received: u64,
}

impl<T> PlaintextTransportParams<T> {
    const fn new() -> Self {
        Self {
            socket: None,
            host_name: String::new(),
            port: 0,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }
}

/// Transport parameters for one plaintext UDP connection.
///
/// The context owns the sockets library handle it delegates to and, once
/// connected, the socket itself. The socket is invalid until [`connect`]
/// succeeds and again after [`disconnect`].
///
/// [`connect`]: NetworkContext::connect
/// [`disconnect`]: NetworkContext::disconnect
pub struct NetworkContext<S: Sockets> {
    sockets: S,
    params: PlaintextTransportParams<S::Socket>,
}

impl<S: Sockets> NetworkContext<S> {
    /// Creates an unconnected context on top of `sockets`.
    pub const fn new(sockets: S) -> Self {
        Self {
            sockets,
            params: PlaintextTransportParams::new(),
        }
    }

    /// Opens a UDP socket towards `host_name:port`.
    ///
    /// Timeouts are handed to the sockets library unchanged. If the context is
    /// already connected, the previous socket is closed first.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `host_name` is empty or longer than
    ///   [`MAX_HOST_NAME_LEN`]
    /// - [`Error::ConnectFailure`] if the sockets library reports a non-zero status
    pub fn connect(
        &mut self,
        host_name: &str,
        port: u16,
        receive_timeout_ms: u32,
        send_timeout_ms: u32,
    ) -> Result<(), Error> {
        if host_name.is_empty() {
            log_error!("Invalid input parameter(s): host name cannot be empty.");
            return Err(Error::InvalidParameter);
        }
        let mut name = String::new();
        if name.push_str(host_name).is_err() {
            log_error!(
                "Invalid input parameter(s): host name longer than {} bytes.",
                MAX_HOST_NAME_LEN
            );
            return Err(Error::InvalidParameter);
        }

        if let Some(previous) = self.params.socket.take() {
            log_warn!("Closing previous socket before reconnecting.");
            self.sockets.disconnect(previous);
        }

        match self
            .sockets
            .udp_connect(host_name, port, receive_timeout_ms, send_timeout_ms)
        {
            Ok(socket) => {
                self.params.socket = Some(socket);
                self.params.host_name = name;
                self.params.port = port;
                self.params.bytes_sent = 0;
                self.params.bytes_received = 0;
                log_debug!("UDP socket connected to {}:{}.", host_name, port);
                Ok(())
            }
            Err(status) => {
                log_error!("Failed to connect to {} with error {}.", host_name, status);
                Err(Error::ConnectFailure)
            }
        }
    }

    /// Closes the socket.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the context holds no valid socket.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        match self.params.socket.take() {
            Some(socket) => {
                self.sockets.disconnect(socket);
                Ok(())
            }
            None => {
                log_error!("Socket cannot be an invalid socket.");
                Err(Error::InvalidParameter)
            }
        }
    }

    /// Whether the context currently holds a valid socket.
    pub fn is_connected(&self) -> bool {
        self.params.socket.is_some()
    }

    /// Host name of the current connection.
    pub fn host_name(&self) -> Option<&str> {
        self.params
            .socket
            .as_ref()
            .map(|_| self.params.host_name.as_str())
    }

    /// Port of the current connection.
    pub fn port(&self) -> Option<u16> {
        self.params.socket.as_ref().map(|_| self.params.port)
    }

    /// Bytes sent since the last successful connect.
    pub fn bytes_sent(&self) -> u64 {
        self.params.bytes_sent
    }

    /// Bytes received since the last successful connect.
    pub fn bytes_received(&self) -> u64 {
        self.params.bytes_received
    }

    /// The underlying sockets library.
    pub fn sockets(&self) -> &S {
        &self.sockets
    }

    /// The underlying sockets library, mutably.
    pub fn sockets_mut(&mut self) -> &mut S {
        &mut self.sockets
    }

    /// Consumes the context, returning the sockets library.
    ///
    /// An open socket is closed first.
    pub fn into_sockets(mut self) -> S {
        if let Some(socket) = self.params.socket.take() {
            self.sockets.disconnect(socket);
        }
        self.sockets
    }
}

impl<S: Sockets> TransportInterface for NetworkContext<S> {
    fn send(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let Some(socket) = self.params.socket.as_mut() else {
            log_error!("invalid input, socket is not connected");
            return Err(Error::InvalidParameter);
        };
        if buf.is_empty() {
            log_error!("invalid input, bytesToSend == 0");
            return Err(Error::InvalidParameter);
        }

        let sent = self.sockets.send(socket, buf).map_err(Error::Socket)?;
        self.params.bytes_sent += sent as u64;
        Ok(sent)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let Some(socket) = self.params.socket.as_mut() else {
            log_error!("invalid input, socket is not connected");
            return Err(Error::InvalidParameter);
        };
        if buf.is_empty() {
            log_error!("invalid input, bytesToRecv == 0");
            return Err(Error::InvalidParameter);
        }

        let received = self.sockets.recv(socket, buf).map_err(Error::Socket)?;
        self.params.bytes_received += received as u64;
        Ok(received)
    }
}

impl<S: Sockets> Read for NetworkContext<S> {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.recv(buf)
    }
}

impl<S: Sockets> Write for NetworkContext<S> {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.send(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Datagrams leave on `send`; nothing is buffered.
        if self.is_connected() {
            Ok(())
        } else {
            Err(Error::InvalidParameter)
        }
    }
}

impl<S: Sockets> Close for NetworkContext<S> {
    type Error = Error;

    fn close(mut self) -> Result<(), Self::Error> {
        self.disconnect()
    }
}

impl<S: Sockets> Connection for NetworkContext<S> {}

impl<S: Sockets> fmt::Debug for NetworkContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkContext")
            .field("connected", &self.is_connected())
            .field("host_name", &self.host_name())
            .field("port", &self.port())
            .field("bytes_sent", &self.params.bytes_sent)
            .field("bytes_received", &self.params.bytes_received)
            .finish()
    }
}
