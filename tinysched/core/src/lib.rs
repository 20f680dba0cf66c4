#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # tinysched core
//!
//! Core types shared by every tinysched layer: the error type, millisecond
//! time stamps, task priorities, compile-time limits, and the two traits
//! that mark the hardware boundary of the kernel ([`Clock`] and
//! [`AlarmTimer`]).

use core::fmt;

pub mod config;
pub mod hal;
pub mod priority;
pub mod time;

pub use config::*;
pub use hal::*;
pub use priority::*;
pub use time::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout tinysched
pub type SchedResult<T> = Result<T, SchedError>;

/// Error types for kernel and primitive operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// The task table has no free slot left
    CapacityExceeded,
    /// The queue has no free slot left
    QueueFull,
    /// The task handle was not issued by this registry
    UnknownTask,
    /// The periodic alarm is already running
    TimerAlreadyArmed,
    /// No alarm hardware is bound to the scheduler
    TimerUnavailable,
    /// The alarm hardware reported a failure
    Timer,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::CapacityExceeded => write!(f, "Task table is full"),
            SchedError::QueueFull => write!(f, "Queue is full"),
            SchedError::UnknownTask => write!(f, "Unknown task handle"),
            SchedError::TimerAlreadyArmed => write!(f, "Periodic alarm already armed"),
            SchedError::TimerUnavailable => write!(f, "No alarm timer available"),
            SchedError::Timer => write!(f, "Alarm timer failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedError {}

#[cfg(feature = "defmt")]
impl defmt::Format for SchedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SchedError::CapacityExceeded => defmt::write!(fmt, "CapacityExceeded"),
            SchedError::QueueFull => defmt::write!(fmt, "QueueFull"),
            SchedError::UnknownTask => defmt::write!(fmt, "UnknownTask"),
            SchedError::TimerAlreadyArmed => defmt::write!(fmt, "TimerAlreadyArmed"),
            SchedError::TimerUnavailable => defmt::write!(fmt, "TimerUnavailable"),
            SchedError::Timer => defmt::write!(fmt, "Timer"),
        }
    }
}
