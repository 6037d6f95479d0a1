//! Common error types for network operations

use core::fmt;

use super::SocketStatus;

/// Status of a transport operation.
///
/// Success is the `Ok` side of the `Result`; this enum carries the failure
/// cases. It is kept small and `Copy` so it can be logged and passed around
/// freely on `no_std` targets.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An argument was rejected before reaching the sockets library: an empty
    /// host name, an empty buffer, or an operation on a context without a
    /// valid socket.
    InvalidParameter,
    /// The sockets library could not open the UDP socket.
    ConnectFailure,
    /// The sockets library reported an error during send or receive.
    Socket(SocketStatus),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter => f.write_str("invalid parameter"),
            Error::ConnectFailure => f.write_str("connect failure"),
            Error::Socket(code) => write!(f, "socket error {}", code),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            Error::ConnectFailure => defmt::write!(f, "ConnectFailure"),
            Error::Socket(code) => defmt::write!(f, "Socket({})", code),
        }
    }
}
