//! Compile-time limits
//!
//! Every table and buffer in tinysched is statically sized. These constants
//! are the defaults used by the kernel and the demos.

/// Maximum number of task control blocks in the registry.
pub const MAX_TASKS: usize = 5;

/// Capacity of the inter-task FIFO queue.
pub const MAX_QUEUE_SIZE: usize = 10;

/// Period of the preemption alarm in milliseconds.
pub const DEFAULT_PREEMPT_PERIOD_MS: u64 = 1000;

/// Cadence of the external polling loop in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
