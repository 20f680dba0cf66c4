//! Spin lock built on an atomic exchange

use core::sync::atomic::{AtomicBool, Ordering};

/// Mutual exclusion by busy-waiting
///
/// `lock` repeatedly swaps `true` into the flag with acquire ordering until
/// it reads back `false`; `unlock` stores `false` with release ordering.
///
/// The lock is not reentrant and has no owner tracking or priority
/// inheritance. Taking it from an interrupt handler while normal context
/// holds it spins forever on a single core.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    /// Create an unlocked lock
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Take the lock if it is free
    pub fn try_lock(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }

    /// Spin until the lock is taken
    pub fn lock(&self) {
        self.lock_with(core::hint::spin_loop);
    }

    /// Like [`SpinLock::lock`], calling `relax` once per failed attempt
    pub fn lock_with<F: FnMut()>(&self, mut relax: F) {
        while self.locked.swap(true, Ordering::Acquire) {
            relax();
        }
    }

    /// Release the lock
    pub fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    /// Check whether the lock is currently held
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Take the lock and release it when the guard drops
    pub fn guard(&self) -> SpinGuard<'_> {
        self.lock();
        SpinGuard { lock: self }
    }
}

/// Scoped hold on a [`SpinLock`]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct SpinGuard<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
