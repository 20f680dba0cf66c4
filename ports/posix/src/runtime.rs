//! External polling loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tinysched_core::{AlarmTimer, Clock, DEFAULT_POLL_INTERVAL_MS};
use tinysched_kernel::Scheduler;

/// Cadence of the reference polling loop
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

/// Statistics gathered by [`run_polling_loop`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Number of `evaluate` calls
    pub evaluations: u64,
    /// Number of evaluations that ran a task
    pub dispatched: u64,
}

/// Call `evaluate` every `poll_interval` until `keep_running` is cleared
pub fn run_polling_loop<C, T, const N: usize>(
    scheduler: &Scheduler<'_, C, T, N>,
    poll_interval: Duration,
    keep_running: &AtomicBool,
) -> LoopStats
where
    C: Clock,
    T: AlarmTimer,
{
    let mut stats = LoopStats::default();
    log::info!(
        target: "tinysched",
        "{}: polling loop started ({}, every {}ms)",
        scheduler.config().name,
        scheduler.policy(),
        poll_interval.as_millis()
    );

    while keep_running.load(Ordering::Acquire) {
        stats.evaluations += 1;
        if let Some(task) = scheduler.evaluate() {
            stats.dispatched += 1;
            log::trace!(target: "tinysched", "evaluation dispatched {}", task);
        }
        thread::sleep(poll_interval);
    }

    log::info!(
        target: "tinysched",
        "{}: polling loop stopped after {} evaluations, {} dispatched",
        scheduler.config().name,
        stats.evaluations,
        stats.dispatched
    );
    stats
}
