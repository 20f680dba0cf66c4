#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # tinysched kernel
//!
//! Periodic task dispatch for a single core. Tasks are registered with a
//! minimum re-invocation interval and a priority (lower value is more
//! urgent); an external polling loop calls [`Scheduler::evaluate`] and, under
//! the preemptive policy, the port's alarm interrupt calls
//! [`Scheduler::on_timer_interrupt`].
//!
//! ```ignore
//! static SCHED: Scheduler<'static, MyClock, MyAlarm, MAX_TASKS> =
//!     Scheduler::new(MyClock::new(), MyAlarm::new());
//!
//! fn blink() { /* ... */ }
//! static BLINK: fn() = blink;
//!
//! SCHED.register(&BLINK, 1_000, priority!(2))?;
//! SCHED.configure(Policy::Priority)?;
//! loop {
//!     SCHED.evaluate();
//! }
//! ```

pub mod config;
pub mod kernel;
pub mod policy;
pub mod registry;
pub mod task;

pub use config::{OverflowAction, PreemptMode, SchedulerConfig, SchedulerConfigBuilder};
pub use kernel::Scheduler;
pub use policy::{FirstComeFirstServed, Policy, PriorityFirst, RoundRobin, Selector};
pub use registry::TaskRegistry;
pub use task::{Runnable, TaskControlBlock, TaskId, TaskSnapshot, TaskState};

pub use tinysched_core::{
    priority, AlarmTimer, Clock, ManualClock, Millis, NoAlarm, SchedError, SchedResult,
    TaskPriority, MAX_TASKS,
};
