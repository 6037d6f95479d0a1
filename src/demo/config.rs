//! Echo demo configuration.
//!
//! Every field has a compiled-in default; a JSON document may override any
//! subset of them:
//!
//! ```rust
//! use libcellular::demo::config::{EchoConfig, DEFAULT_MAX_RETRY_COUNT};
//!
//! let config = EchoConfig::from_json(br#"{"endpoint":"echo.example.com","port":7}"#).unwrap();
//! assert_eq!(config.endpoint.as_str(), "echo.example.com");
//! assert_eq!(config.port, 7);
//! assert_eq!(config.max_retry_count, DEFAULT_MAX_RETRY_COUNT);
//! ```

use core::fmt;

use heapless::String;
use serde::Deserialize;

use crate::network::transport::MAX_HOST_NAME_LEN;

/// Echo server endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "PLACE_HOLDER";
/// Echo server port.
pub const DEFAULT_PORT: u16 = 9000;
/// Send and receive timeout, in milliseconds.
pub const DEFAULT_SEND_RECV_TIMEOUT_MS: u32 = 5000;
/// Largest packet sent by the echo loop: the modem's maximum send length.
pub const DEFAULT_BUFFER_MAX_SIZE: usize = 1460;
/// Consecutive failed receives tolerated before the echo loop gives up.
pub const DEFAULT_MAX_RETRY_COUNT: u16 = 10;
/// Size of the first packet sent by the echo loop.
pub const DEFAULT_FIRST_PACKET_SIZE: usize = 10;

/// Rejected configuration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse,
    /// The endpoint is empty.
    EmptyEndpoint,
    /// Port zero cannot be connected to.
    InvalidPort,
    /// The first packet is empty or larger than the largest packet.
    InvalidPacketRange,
    /// The largest packet does not fit the echo buffers.
    BufferTooLarge {
        /// Configured `buffer_max_size`.
        requested: usize,
        /// Capacity of the echo buffers.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse => f.write_str("malformed configuration"),
            ConfigError::EmptyEndpoint => f.write_str("endpoint cannot be empty"),
            ConfigError::InvalidPort => f.write_str("port cannot be zero"),
            ConfigError::InvalidPacketRange => {
                f.write_str("first packet size must be in 1..=buffer_max_size")
            }
            ConfigError::BufferTooLarge {
                requested,
                capacity,
            } => write!(
                f,
                "buffer_max_size {} exceeds buffer capacity {}",
                requested, capacity
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Parse => defmt::write!(f, "Parse"),
            ConfigError::EmptyEndpoint => defmt::write!(f, "EmptyEndpoint"),
            ConfigError::InvalidPort => defmt::write!(f, "InvalidPort"),
            ConfigError::InvalidPacketRange => defmt::write!(f, "InvalidPacketRange"),
            ConfigError::BufferTooLarge {
                requested,
                capacity,
            } => defmt::write!(f, "BufferTooLarge({}, {})", requested, capacity),
        }
    }
}

/// Settings of the UDP echo demo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    /// Echo server host name or address.
    pub endpoint: String<MAX_HOST_NAME_LEN>,
    /// Echo server port.
    pub port: u16,
    /// Timeout applied to both send and receive.
    pub send_recv_timeout_ms: u32,
    /// Largest packet size, inclusive.
    pub buffer_max_size: usize,
    /// Consecutive failed receives tolerated for one packet size.
    pub max_retry_count: u16,
    /// Smallest packet size, where the loop starts.
    pub first_packet_size: usize,
}

impl Default for EchoConfig {
    fn default() -> Self {
        let mut endpoint = String::new();
        let _ = endpoint.push_str(DEFAULT_ENDPOINT);
        Self {
            endpoint,
            port: DEFAULT_PORT,
            send_recv_timeout_ms: DEFAULT_SEND_RECV_TIMEOUT_MS,
            buffer_max_size: DEFAULT_BUFFER_MAX_SIZE,
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            first_packet_size: DEFAULT_FIRST_PACKET_SIZE,
        }
    }
}

impl EchoConfig {
    /// Parses a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        let (config, _) =
            serde_json_core::from_slice::<EchoConfig>(json).map_err(|_| ConfigError::Parse)?;
        Ok(config)
    }

    /// Checks the configuration against echo buffers of `capacity` bytes.
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.buffer_max_size > capacity {
            return Err(ConfigError::BufferTooLarge {
                requested: self.buffer_max_size,
                capacity,
            });
        }
        if self.first_packet_size == 0 || self.first_packet_size > self.buffer_max_size {
            return Err(ConfigError::InvalidPacketRange);
        }
        Ok(())
    }
}
