//! Transport implementations built on the [`Sockets`](super::Sockets) seam.

/// Plaintext (unencrypted) UDP transport
pub mod udp;

pub use udp::{MAX_HOST_NAME_LEN, NetworkContext};
