//! Task creation and join helpers.
//!
//! Runs a worker function on its own task and lets the creator wait for it
//! with a timeout. The join primitive is a binary semaphore that the wrapper
//! gives after the worker returns:
//!
//! ```text
//! creator                      wrapper task
//!   │ thread_create ──────────────▶ │
//!   │                               │ thread_func(param)
//!   │ timed_join ── take ◀─ give ── │
//!   ▼                               ▼ exit
//! ```
//!
//! # Example
//!
//! ```rust
//! use libcellular::system::task::thread_create;
//!
//! let handle = thread_create(|n: u32| assert_eq!(n, 7), 7).unwrap();
//! handle.timed_join(1_000).unwrap();
//! ```

use core::fmt;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, bounded};

/// Name given to every wrapper task.
pub const TASK_NAME: &str = "ThreadWrapper";

/// Stack size of every wrapper task, in bytes.
pub const TASK_STACK_SIZE: usize = 64 * 1024;

/// Failure to create or join a wrapper task.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum JoinError {
    /// The scheduler refused to create the task.
    Spawn,
    /// The worker did not finish within the join timeout.
    Timeout,
    /// The worker signalled completion but its task then failed.
    Panicked,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::Spawn => f.write_str("task creation failed"),
            JoinError::Timeout => f.write_str("join timed out"),
            JoinError::Panicked => f.write_str("task panicked"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for JoinError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            JoinError::Spawn => defmt::write!(f, "Spawn"),
            JoinError::Timeout => defmt::write!(f, "Timeout"),
            JoinError::Panicked => defmt::write!(f, "Panicked"),
        }
    }
}

/// A binary semaphore: at most one outstanding "give".
///
/// Clones share the same semaphore.
#[derive(Debug, Clone)]
pub struct BinarySemaphore {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl BinarySemaphore {
    /// Creates a semaphore in the taken state.
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Gives the semaphore. Giving an already given semaphore has no effect.
    pub fn give(&self) {
        let _ = self.tx.try_send(());
    }

    /// Takes the semaphore, waiting up to `timeout_ms`. Returns `false` on
    /// timeout.
    pub fn take(&self, timeout_ms: u32) -> bool {
        self.rx
            .recv_timeout(Duration::from_millis(u64::from(timeout_ms)))
            .is_ok()
    }
}

impl Default for BinarySemaphore {
    fn default() -> Self {
        Self::new()
    }
}

/// Bookkeeping for one wrapper task, owned by the creator until joined.
#[derive(Debug)]
struct TaskParam {
    join: BinarySemaphore,
    task: JoinHandle<()>,
}

/// Handle returned by [`thread_create`]. Joining consumes it.
#[derive(Debug)]
pub struct ThreadHandle {
    param: TaskParam,
}

/// Spawns `thread_func(param)` on a new task.
///
/// The task gives the join semaphore after `thread_func` returns; a worker
/// that panics never gives it, so its join times out.
pub fn thread_create<F, P>(thread_func: F, param: P) -> Result<ThreadHandle, JoinError>
where
    F: FnOnce(P) + Send + 'static,
    P: Send + 'static,
{
    let join = BinarySemaphore::new();
    let done = join.clone();

    let task = thread::Builder::new()
        .name(TASK_NAME.into())
        .stack_size(TASK_STACK_SIZE)
        .spawn(move || {
            thread_func(param);
            done.give();
        })
        .map_err(|_| {
            log_error!("Failed to create task {}.", TASK_NAME);
            JoinError::Spawn
        })?;

    Ok(ThreadHandle {
        param: TaskParam { join, task },
    })
}

impl ThreadHandle {
    /// Waits up to `timeout_ms` for the worker to finish.
    ///
    /// The task bookkeeping is released whatever the outcome; a worker that
    /// is still running after a timeout is left detached.
    pub fn timed_join(self, timeout_ms: u32) -> Result<(), JoinError> {
        let TaskParam { join, task } = self.param;

        if !join.take(timeout_ms) {
            log_error!(
                "Waiting thread exit failed after {} ms. Task abort.",
                timeout_ms
            );
            return Err(JoinError::Timeout);
        }

        task.join().map_err(|_| JoinError::Panicked)
    }

    /// Whether the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.param.task.is_finished()
    }
}

/// Blocks the calling task for `delay_ms`.
pub fn time_delay(delay_ms: u32) {
    thread::sleep(Duration::from_millis(u64::from(delay_ms)));
}
