//! Boolean event flag

use core::sync::atomic::{AtomicBool, Ordering};

/// Boolean signal between tasks
///
/// `set`, `clear` and `check` are single loads and stores. A consumer that
/// calls `check` and then `clear` can miss a `set` that lands in between;
/// [`EventFlag::take`] reads and clears in one atomic step.
#[derive(Debug, Default)]
pub struct EventFlag {
    flag: AtomicBool,
}

impl EventFlag {
    /// Create a cleared flag
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Raise the flag
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Lower the flag
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Read the flag
    pub fn check(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Read and lower the flag atomically
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}
