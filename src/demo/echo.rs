//! UDP echo demo.
//!
//! Sends packets of increasing size (`first_packet_size..=buffer_max_size`)
//! to a UDP echo server and checks that every echoed byte matches. UDP may
//! lose packets, so a missing or short reply is retried with the same size;
//! only `max_retry_count` consecutive losses abort the run.
//!
//! The payload is the repeating pattern `0, 1, ..., 255, 0, 1, ...`.
//!
//! # Retry policy
//!
//! ```text
//!          ┌──────────────┐  sent != size   ┌───────┐
//!   ┌─────▶│  send(size)  │────────────────▶│ abort │
//!   │      └──────┬───────┘                 └───────┘
//!   │             ▼                             ▲
//!   │      ┌──────────────┐  no reply           │ failures > max_retry_count
//!   │      │  recv(size)  │──────────▶ failures += 1
//!   │      └──────┬───────┘                     │ otherwise: resend
//!   │             ▼ reply of `size` bytes       │
//!   │      ┌──────────────┐  mismatch     ┌───────┐
//!   │      │   compare    │──────────────▶│ abort │
//!   │      └──────┬───────┘               └───────┘
//!   │             ▼ match
//!   └── failures = 0, size += 1
//! ```

use core::fmt;

use crate::demo::config::{ConfigError, DEFAULT_BUFFER_MAX_SIZE, EchoConfig};
use crate::network::error::Error;
use crate::network::transport::NetworkContext;
use crate::network::{Sockets, TransportInterface};

/// Why an echo run stopped early.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EchoError {
    /// The configuration does not fit the echo buffers.
    Config(ConfigError),
    /// The transport could not be connected.
    Connect(Error),
    /// A packet could not be sent in full.
    Send {
        /// Packet size being sent.
        size: usize,
    },
    /// Too many consecutive receives failed for one packet size.
    RetriesExhausted {
        /// Packet size being echoed.
        size: usize,
        /// Consecutive failures counted.
        failures: u32,
    },
    /// The echoed packet differs from the one sent.
    Mismatch {
        /// Packet size being echoed.
        size: usize,
        /// Index of the first differing byte.
        offset: usize,
    },
}

impl fmt::Display for EchoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoError::Config(e) => write!(f, "invalid configuration: {}", e),
            EchoError::Connect(e) => write!(f, "connect failed: {}", e),
            EchoError::Send { size } => write!(f, "send of {} bytes failed", size),
            EchoError::RetriesExhausted { size, failures } => write!(
                f,
                "no echo for {} byte packet after {} attempts",
                size, failures
            ),
            EchoError::Mismatch { size, offset } => write!(
                f,
                "echo of {} byte packet differs at offset {}",
                size, offset
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EchoError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EchoError::Config(e) => defmt::write!(f, "Config({})", e),
            EchoError::Connect(e) => defmt::write!(f, "Connect({})", e),
            EchoError::Send { size } => defmt::write!(f, "Send({})", size),
            EchoError::RetriesExhausted { size, failures } => {
                defmt::write!(f, "RetriesExhausted({}, {})", size, failures)
            }
            EchoError::Mismatch { size, offset } => {
                defmt::write!(f, "Mismatch({}, {})", size, offset)
            }
        }
    }
}

/// Summary of a completed echo run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct EchoReport {
    /// Packets echoed and verified.
    pub packets_echoed: usize,
    /// Failed receives that were retried.
    pub retries: usize,
    /// Size of the last verified packet.
    pub last_size: usize,
}

/// Fills `buf` with `0, 1, ..., 255, 0, 1, ...`.
pub fn initialize_test_data(buf: &mut [u8]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = i as u8;
    }
}

/// Send and receive buffers of the echo test, `N` bytes each.
#[derive(Debug, Clone)]
pub struct EchoTest<const N: usize = DEFAULT_BUFFER_MAX_SIZE> {
    send_buf: [u8; N],
    recv_buf: [u8; N],
}

impl<const N: usize> EchoTest<N> {
    /// Creates the buffers, both holding the test pattern.
    pub fn new() -> Self {
        let mut test = Self {
            send_buf: [0; N],
            recv_buf: [0; N],
        };
        initialize_test_data(&mut test.send_buf);
        initialize_test_data(&mut test.recv_buf);
        test
    }

    /// The outgoing payload.
    pub fn send_buffer(&self) -> &[u8] {
        &self.send_buf
    }

    /// The last received payload.
    pub fn recv_buffer(&self) -> &[u8] {
        &self.recv_buf
    }

    /// Sends the first `size` bytes of the pattern. Succeeds only if the
    /// transport takes the whole packet; a `size` beyond the buffer fails.
    pub fn send_packet<T>(&self, transport: &mut T, size: usize) -> bool
    where
        T: TransportInterface + ?Sized,
    {
        let Some(packet) = self.send_buf.get(..size) else {
            return false;
        };
        matches!(transport.send(packet), Ok(sent) if sent == size)
    }

    /// Receives until a datagram of exactly `size` bytes arrives.
    ///
    /// Datagrams of any other positive length (late echoes of earlier
    /// packets) are dropped and the receive repeated. A timeout, a
    /// transport error or a `size` beyond the buffer ends the attempt.
    pub fn recv_packet<T>(&mut self, transport: &mut T, size: usize) -> bool
    where
        T: TransportInterface + ?Sized,
    {
        let Some(packet) = self.recv_buf.get_mut(..size) else {
            return false;
        };
        loop {
            match transport.recv(packet) {
                Ok(received) if received == size => return true,
                Ok(0) | Err(_) => return false,
                Ok(received) => {
                    log_debug!("Dropping stale {} byte datagram.", received);
                }
            }
        }
    }

    /// Runs the send/receive/compare loop over every configured packet size.
    pub fn loop_send_and_receive<T>(
        &mut self,
        transport: &mut T,
        config: &EchoConfig,
    ) -> Result<EchoReport, EchoError>
    where
        T: TransportInterface + ?Sized,
    {
        config.validate(N).map_err(EchoError::Config)?;

        let mut report = EchoReport::default();
        // Wider than `max_retry_count` so the limit is always reachable.
        let mut fail_count: u32 = 0;
        let mut size = config.first_packet_size;

        while size <= config.buffer_max_size {
            if !self.send_packet(transport, size) {
                log_error!("Send UDP packet failed");
                return Err(EchoError::Send { size });
            }

            self.recv_buf.fill(0);
            if !self.recv_packet(transport, size) {
                // UDP may drop the packet or its echo; send it again.
                fail_count += 1;
                report.retries += 1;
                log_warn!("Recv UDP packet failed, count={}", fail_count);

                if fail_count > u32::from(config.max_retry_count) {
                    log_error!("Reach max retry count, recv UDP packet failed");
                    return Err(EchoError::RetriesExhausted {
                        size,
                        failures: fail_count,
                    });
                }
                continue;
            }

            if let Some(offset) = first_difference(&self.send_buf[..size], &self.recv_buf[..size])
            {
                log_error!("Compare send/recv buffer failed");
                return Err(EchoError::Mismatch { size, offset });
            }

            fail_count = 0;
            report.packets_echoed += 1;
            report.last_size = size;
            size += 1;
        }

        Ok(report)
    }

    /// Validates `config`, connects, runs the echo loop and disconnects,
    /// logging the verdict.
    ///
    /// An invalid configuration is rejected before any socket is opened. The
    /// context is disconnected whatever the outcome.
    pub fn run<S: Sockets>(
        &mut self,
        context: &mut NetworkContext<S>,
        config: &EchoConfig,
    ) -> Result<EchoReport, EchoError> {
        let result = config
            .validate(N)
            .inspect_err(|e| log_error!("Invalid echo configuration: {}", e))
            .map_err(EchoError::Config)
            .and_then(|()| {
                transport_network_connect(context, config).map_err(EchoError::Connect)
            })
            .and_then(|()| self.loop_send_and_receive(context, config));

        match &result {
            Ok(report) => {
                log_info!(
                    "Echoed {} packets with {} retries.",
                    report.packets_echoed,
                    report.retries
                );
                log_info!("============ Demo Pass ============");
            }
            Err(_) => log_error!("============ Demo Failed ============"),
        }

        // A failed connect leaves no socket behind, which disconnect reports.
        let _ = context.disconnect();
        result
    }
}

impl<const N: usize> Default for EchoTest<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn first_difference(sent: &[u8], received: &[u8]) -> Option<usize> {
    sent.iter().zip(received).position(|(a, b)| a != b)
}

fn transport_network_connect<S: Sockets>(
    context: &mut NetworkContext<S>,
    config: &EchoConfig,
) -> Result<(), Error> {
    context
        .connect(
            &config.endpoint,
            config.port,
            config.send_recv_timeout_ms,
            config.send_recv_timeout_ms,
        )
        .inspect_err(|e| log_error!("UDP connect failed: {}", e))
}

/// Entry point of the echo task: runs a full echo test over `sockets` with
/// buffers of [`DEFAULT_BUFFER_MAX_SIZE`] bytes.
pub fn run_echo_task<S: Sockets>(sockets: S, config: &EchoConfig) -> Result<EchoReport, EchoError> {
    let mut context = NetworkContext::new(sockets);
    EchoTest::<DEFAULT_BUFFER_MAX_SIZE>::new().run(&mut context, config)
}
