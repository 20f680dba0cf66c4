//! Suspending variants for hosts with a thread scheduler
//!
//! These park the calling thread instead of spinning. They are only
//! available with the `std` feature; the spinning primitives keep their
//! latency characteristics and are never converted silently.

use parking_lot::{const_mutex, Condvar, Mutex};

/// Counting semaphore that parks waiters
#[derive(Debug)]
pub struct Semaphore {
    count: Mutex<isize>,
    available: Condvar,
}

impl Semaphore {
    /// Create a semaphore holding `initial` permits
    pub const fn new(initial: isize) -> Self {
        Self {
            count: const_mutex(initial),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count <= 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    /// Take a permit if one is available
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// Return a permit and wake one waiter
    pub fn signal(&self) {
        *self.count.lock() += 1;
        self.available.notify_one();
    }

    /// Current count
    pub fn count(&self) -> isize {
        *self.count.lock()
    }
}

/// Mutual exclusion lock that parks waiters
#[derive(Debug)]
pub struct Lock {
    locked: Mutex<bool>,
    released: Condvar,
}

impl Lock {
    /// Create an unlocked lock
    pub const fn new() -> Self {
        Self {
            locked: const_mutex(false),
            released: Condvar::new(),
        }
    }

    /// Block until the lock is taken
    pub fn lock(&self) {
        let mut locked = self.locked.lock();
        while *locked {
            self.released.wait(&mut locked);
        }
        *locked = true;
    }

    /// Take the lock if it is free
    pub fn try_lock(&self) -> bool {
        let mut locked = self.locked.lock();
        if *locked {
            false
        } else {
            *locked = true;
            true
        }
    }

    /// Release the lock and wake one waiter
    pub fn unlock(&self) {
        *self.locked.lock() = false;
        self.released.notify_one();
    }

    /// Check whether the lock is currently held
    pub fn is_locked(&self) -> bool {
        *self.locked.lock()
    }
}

impl Default for Lock {
    fn default() -> Self {
        Self::new()
    }
}
