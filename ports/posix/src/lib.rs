//! Linux/Unix host port for tinysched.
//!
//! Provides the pieces a microcontroller board would supply: a millisecond
//! [`HostClock`], a periodic [`HostAlarm`] whose "interrupt" is a dedicated
//! thread calling a handler function, and the external polling loop.
//! Critical sections come from the `critical-section` crate's `std`
//! implementation, which this crate enables.
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use tinysched_kernel::{Policy, Scheduler};
//! use tinysched_posix::{run_polling_loop, HostAlarm, HostClock, DEFAULT_POLL_INTERVAL};
//!
//! static SCHED: Scheduler<'static, HostClock, HostAlarm, 5> =
//!     Scheduler::new(HostClock::new(), HostAlarm::new(on_alarm));
//! static RUNNING: AtomicBool = AtomicBool::new(true);
//!
//! fn on_alarm() {
//!     SCHED.on_timer_interrupt();
//! }
//!
//! SCHED.configure(Policy::Preemptive).unwrap();
//! run_polling_loop(&SCHED, DEFAULT_POLL_INTERVAL, &RUNNING);
//! ```

pub mod runtime;
pub mod time;

pub use runtime::{run_polling_loop, LoopStats, DEFAULT_POLL_INTERVAL};
pub use time::{AlarmHandler, HostAlarm, HostClock};
