//! Counting semaphore that busy-waits

use core::sync::atomic::{AtomicIsize, Ordering};

/// Counting semaphore
///
/// `wait` spins until the count is positive and then decrements it; `signal`
/// increments unconditionally. There is no upper bound, so a `signal`
/// without a matching `wait` grows the count past its initial value.
///
/// The decrement is a compare-and-swap, so a `signal` or `wait` from an
/// interrupt handler cannot be lost between the check and the decrement.
#[derive(Debug)]
pub struct Semaphore {
    count: AtomicIsize,
}

impl Semaphore {
    /// Create a semaphore holding `initial` permits
    pub const fn new(initial: isize) -> Self {
        Self {
            count: AtomicIsize::new(initial),
        }
    }

    /// Take a permit if one is available
    pub fn try_wait(&self) -> bool {
        let mut current = self.count.load(Ordering::Acquire);
        while current > 0 {
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }

    /// Spin until a permit is available, then take it
    ///
    /// There is no timeout. On a single core this only returns once an
    /// interrupt handler signals the semaphore.
    pub fn wait(&self) {
        self.wait_with(core::hint::spin_loop);
    }

    /// Like [`Semaphore::wait`], calling `relax` once per failed attempt
    pub fn wait_with<F: FnMut()>(&self, mut relax: F) {
        while !self.try_wait() {
            relax();
        }
    }

    /// Return a permit
    pub fn signal(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Current count
    pub fn count(&self) -> isize {
        self.count.load(Ordering::Acquire)
    }
}
