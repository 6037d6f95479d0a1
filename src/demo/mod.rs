//! Demo applications for the plaintext UDP transport.
//!
//! - [`echo`]: send packets of growing size to a UDP echo server and verify
//!   every echoed byte, retrying lost packets a bounded number of times
//! - [`qualification`]: configure the transport interface for an external
//!   qualification test harness and run it
//! - [`config`]: echo demo settings with compiled-in defaults

/// Echo demo settings.
pub mod config;

/// UDP echo test.
pub mod echo;

/// Transport interface qualification setup.
pub mod qualification;
