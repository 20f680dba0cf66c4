//! Hardware boundary of the kernel
//!
//! The kernel never touches peripherals directly. A port supplies a [`Clock`]
//! for the due predicate and an [`AlarmTimer`] for the preemptive policy, and
//! wires the alarm's interrupt to `Scheduler::on_timer_interrupt`.

use core::cell::Cell;

use critical_section::Mutex;

use crate::{Millis, SchedError, SchedResult};

/// Monotonic millisecond clock
pub trait Clock {
    /// Read the current time
    fn now(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Periodic alarm that raises the scheduler interrupt
pub trait AlarmTimer {
    /// Start raising the interrupt every `period`
    fn arm_periodic(&mut self, period: Millis) -> SchedResult<()>;

    /// Stop raising the interrupt
    fn disarm(&mut self) -> SchedResult<()>;

    /// Acknowledge the pending interrupt and re-enable the alarm
    fn clear_interrupt(&mut self);
}

/// Alarm stand-in for targets that only use the polled policies
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlarm;

impl AlarmTimer for NoAlarm {
    fn arm_periodic(&mut self, _period: Millis) -> SchedResult<()> {
        Err(SchedError::TimerUnavailable)
    }

    fn disarm(&mut self) -> SchedResult<()> {
        Ok(())
    }

    fn clear_interrupt(&mut self) {}
}

/// Software clock driven by the caller
///
/// Used for simulation and tests. Shareable between normal and interrupt
/// context.
pub struct ManualClock {
    now: Mutex<Cell<Millis>>,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub const fn new(start: Millis) -> Self {
        Self {
            now: Mutex::new(Cell::new(start)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Millis) {
        critical_section::with(|cs| self.now.borrow(cs).set(now));
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) -> Millis {
        critical_section::with(|cs| {
            let cell = self.now.borrow(cs);
            let next = cell.get().wrapping_add(ms);
            cell.set(next);
            next
        })
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Millis::ZERO)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        critical_section::with(|cs| self.now.borrow(cs).get())
    }
}
