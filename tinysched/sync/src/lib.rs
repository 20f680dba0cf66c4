#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # tinysched sync
//!
//! Communication and synchronization primitives used by task bodies. None of
//! them know about the scheduler; they are plain values placed in `static`s
//! and shared between normal and interrupt context.
//!
//! - [`Queue`] / [`SharedQueue`]: bounded FIFO of items
//! - [`EventFlag`]: boolean signal
//! - [`Semaphore`]: counting semaphore that busy-waits
//! - [`SpinLock`]: mutual exclusion by atomic exchange
//!
//! `Semaphore::wait` and `SpinLock::lock` spin on the only core. Holding the
//! lock in normal context and taking it again from an interrupt handler
//! never returns. With the `std` feature, [`blocking`] offers suspending
//! variants for hosts with a real thread scheduler.

pub mod flag;
pub mod queue;
pub mod semaphore;
pub mod spin;

#[cfg(feature = "std")]
pub mod blocking;

pub use flag::EventFlag;
pub use queue::{Queue, SharedQueue};
pub use semaphore::Semaphore;
pub use spin::{SpinGuard, SpinLock};

pub use tinysched_core::{SchedError, SchedResult};
