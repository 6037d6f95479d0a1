//! # libcellular - UDP transport demos for cellular IoT devices
//!
//! Glue code that wires a plaintext UDP transport into two demo applications
//! for cellular modules running on a real-time operating system:
//!
//! - a **UDP echo test** that sends packets of increasing size to an echo
//!   server and checks every byte that comes back, and
//! - a **transport qualification test** setup that hands a configured
//!   transport interface to an external compliance runner.
//!
//! The heavy lifting (modem driver, sockets library, scheduler) lives outside
//! this crate. It is consumed through the [`network::Sockets`] trait and, on
//! hosts with `std`, through the thread/semaphore wrapper in [`system::task`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use libcellular::demo::config::EchoConfig;
//! use libcellular::demo::echo::run_echo_task;
//! use libcellular::network::sockets::StdSockets;
//!
//! let config = EchoConfig::from_json(br#"{"endpoint":"127.0.0.1","port":9000}"#).unwrap();
//! let report = run_echo_task(StdSockets, &config);
//! # let _ = report;
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `std` (default): host sockets backend, task wrapper and stderr logging
//! - `defmt`: route log output and error formatting through defmt

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod log;

/// Network abstraction layer: transport traits, the sockets library seam and
/// the plaintext UDP transport.
pub mod network;

/// System utilities: task creation and join helpers.
pub mod system;

/// Demo applications built on the UDP transport.
pub mod demo;
