//! Bounded FIFO queue for inter-task communication

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use tinysched_core::{SchedError, SchedResult};

/// Bounded FIFO queue
///
/// A ring buffer of at most `N` items. A push onto a full queue never
/// overwrites or reorders the items already stored.
///
/// `Queue` takes `&mut self`; callers that touch it from both normal and
/// interrupt context must serialize access themselves, or use
/// [`SharedQueue`].
pub struct Queue<T, const N: usize> {
    items: Deque<T, N>,
}

impl<T, const N: usize> Queue<T, N> {
    /// Create a new empty queue
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    /// Append an item at the tail
    pub fn push(&mut self, item: T) -> SchedResult<()> {
        self.items.push_back(item).map_err(|_| SchedError::QueueFull)
    }

    /// Append an item at the tail, dropping it if the queue is full
    ///
    /// Returns `false` when the item was dropped.
    pub fn push_lossy(&mut self, item: T) -> bool {
        match self.items.push_back(item) {
            Ok(()) => true,
            Err(_) => {
                log::trace!(target: "tinysched", "queue full, item dropped");
                false
            }
        }
    }

    /// Take the item at the head, `None` when empty
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Look at the item at the head without removing it
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the queue is full
    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maximum number of items
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every stored item
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T, const N: usize> Default for Queue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue shared between normal and interrupt context
///
/// Every operation runs inside a critical section, so a push from an
/// interrupt handler cannot interleave with a pop in progress.
pub struct SharedQueue<T, const N: usize> {
    inner: Mutex<RefCell<Queue<T, N>>>,
}

impl<T, const N: usize> SharedQueue<T, N> {
    /// Create a new empty shared queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Queue::new())),
        }
    }

    /// Run `f` with exclusive access to the queue
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Queue<T, N>) -> R,
    {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow_ref_mut(cs);
            f(&mut queue)
        })
    }

    /// Append an item at the tail
    pub fn push(&self, item: T) -> SchedResult<()> {
        self.with(|queue| queue.push(item))
    }

    /// Append an item at the tail, dropping it if the queue is full
    pub fn push_lossy(&self, item: T) -> bool {
        self.with(|queue| queue.push_lossy(item))
    }

    /// Take the item at the head, `None` when empty
    pub fn pop(&self) -> Option<T> {
        self.with(|queue| queue.pop())
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.with(|queue| queue.len())
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.with(|queue| queue.is_empty())
    }

    /// Maximum number of items
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for SharedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
