//! Transport interface qualification demo.
//!
//! The qualification test itself is an external harness. This module only
//! prepares what the harness needs (two network contexts, the transport
//! interface bound to the first one, and connect/disconnect hooks) and then
//! hands control to a [`QualificationRunner`].
//!
//! # Example
//!
//! ```rust
//! use libcellular::demo::qualification::{
//!     QualificationRunner, TestHostInfo, TransportTestParam, run_transport_test_task,
//!     setup_transport_test_param,
//! };
//! use libcellular::network::{SocketStatus, Sockets};
//!
//! struct Offline;
//!
//! impl Sockets for Offline {
//!     type Socket = ();
//!     fn udp_connect(&mut self, _: &str, _: u16, _: u32, _: u32) -> Result<(), SocketStatus> {
//!         Err(-1)
//!     }
//!     fn disconnect(&mut self, _: ()) {}
//!     fn send(&mut self, _: &mut (), _: &[u8]) -> Result<usize, SocketStatus> { Err(-1) }
//!     fn recv(&mut self, _: &mut (), _: &mut [u8]) -> Result<usize, SocketStatus> { Err(-1) }
//! }
//!
//! struct ConnectOnly;
//!
//! impl QualificationRunner<Offline> for ConnectOnly {
//!     type Report = bool;
//!     fn run(&mut self, param: &mut TransportTestParam<Offline>) -> bool {
//!         let host = TestHostInfo { host_name: "echo.example.com", port: 9000 };
//!         (param.network_connect)(&mut param.network_context, &host).is_success()
//!     }
//! }
//!
//! let mut param = setup_transport_test_param(Offline, Offline);
//! assert!(!run_transport_test_task(&mut ConnectOnly, &mut param));
//! ```

use crate::network::transport::NetworkContext;
use crate::network::{Sockets, TransportInterface};
#[cfg(feature = "std")]
use crate::system::task::{self, JoinError, ThreadHandle};

/// Send and receive timeout used by [`network_connect`], in milliseconds.
pub const QUALIFICATION_TIMEOUT_MS: u32 = 5000;

/// Server the harness connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestHostInfo<'a> {
    /// Host name or address.
    pub host_name: &'a str,
    /// Port.
    pub port: u16,
}

/// Result of a connect hook, as the harness understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkConnectStatus {
    /// The transport is connected.
    Success,
    /// The transport could not be connected.
    Failure,
}

impl NetworkConnectStatus {
    /// Whether this is [`NetworkConnectStatus::Success`].
    pub fn is_success(self) -> bool {
        self == NetworkConnectStatus::Success
    }
}

/// Connect hook signature.
pub type NetworkConnectFn<S> =
    fn(&mut NetworkContext<S>, &TestHostInfo<'_>) -> NetworkConnectStatus;

/// Disconnect hook signature.
pub type NetworkDisconnectFn<S> = fn(&mut NetworkContext<S>);

/// Connects `context` to the harness's host with fixed
/// [`QUALIFICATION_TIMEOUT_MS`] timeouts.
pub fn network_connect<S: Sockets>(
    context: &mut NetworkContext<S>,
    host_info: &TestHostInfo<'_>,
) -> NetworkConnectStatus {
    match context.connect(
        host_info.host_name,
        host_info.port,
        QUALIFICATION_TIMEOUT_MS,
        QUALIFICATION_TIMEOUT_MS,
    ) {
        Ok(()) => NetworkConnectStatus::Success,
        Err(e) => {
            log_error!("UDP connect return fail, status={}", e);
            NetworkConnectStatus::Failure
        }
    }
}

/// Disconnects `context`. The harness has no use for the status.
pub fn network_disconnect<S: Sockets>(context: &mut NetworkContext<S>) {
    let _ = context.disconnect();
}

/// Everything the qualification harness is given.
#[derive(Debug)]
pub struct TransportTestParam<S: Sockets> {
    /// Context behind [`TransportTestParam::transport`].
    pub network_context: NetworkContext<S>,
    /// Independent context for tests that need a second connection.
    pub second_network_context: NetworkContext<S>,
    /// Connect hook.
    pub network_connect: NetworkConnectFn<S>,
    /// Disconnect hook.
    pub network_disconnect: NetworkDisconnectFn<S>,
}

impl<S: Sockets> TransportTestParam<S> {
    /// The transport interface under test, bound to `network_context`.
    pub fn transport(&mut self) -> &mut dyn TransportInterface {
        &mut self.network_context
    }
}

/// Builds the harness parameters: one context per sockets handle and the
/// plaintext UDP connect/disconnect hooks.
pub fn setup_transport_test_param<S: Sockets>(
    sockets: S,
    second_sockets: S,
) -> TransportTestParam<S> {
    TransportTestParam {
        network_context: NetworkContext::new(sockets),
        second_network_context: NetworkContext::new(second_sockets),
        network_connect: network_connect::<S>,
        network_disconnect: network_disconnect::<S>,
    }
}

/// The external qualification test harness.
pub trait QualificationRunner<S: Sockets> {
    /// Outcome reported by the harness.
    type Report;

    /// Runs the qualification tests against `param`.
    fn run(&mut self, param: &mut TransportTestParam<S>) -> Self::Report;
}

/// Entry point of the transport test task: hands control to `runner`.
pub fn run_transport_test_task<S, R>(runner: &mut R, param: &mut TransportTestParam<S>) -> R::Report
where
    S: Sockets,
    R: QualificationRunner<S> + ?Sized,
{
    log_info!("Starting transport qualification test.");
    runner.run(param)
}

/// Platform functions the harness calls back into on `std` hosts.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

#[cfg(feature = "std")]
impl HostPlatform {
    /// Runs `thread_func(param)` on a new task.
    pub fn thread_create<F, P>(&self, thread_func: F, param: P) -> Result<ThreadHandle, JoinError>
    where
        F: FnOnce(P) + Send + 'static,
        P: Send + 'static,
    {
        task::thread_create(thread_func, param)
    }

    /// Waits up to `timeout_ms` for a task created by
    /// [`HostPlatform::thread_create`].
    pub fn thread_timed_join(&self, handle: ThreadHandle, timeout_ms: u32) -> Result<(), JoinError> {
        handle.timed_join(timeout_ms)
    }

    /// Blocks the calling task, giving the network time to respond.
    pub fn time_delay(&self, delay_ms: u32) {
        task::time_delay(delay_ms)
    }
}
