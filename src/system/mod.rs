//! System utilities for the demo tasks.
//!
//! # Available Utilities
//!
//! - **[`task`]** (`std` only): spawn a worker on its own task and join it
//!   through a binary semaphore with a timeout
//!
//! On RTOS targets the same roles are played by the scheduler's task and
//! semaphore primitives; the demos themselves never depend on this module.

/// Task creation, timed join and delay.
#[cfg(feature = "std")]
pub mod task;
