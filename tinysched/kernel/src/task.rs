//! Task control blocks

use core::fmt;

use tinysched_core::{Millis, TaskPriority};

/// Body of a schedulable task
///
/// A task carries its own state, usually as a closure capturing statics or
/// interior-mutable values. Bodies run to completion; nothing aborts them
/// once started.
pub trait Runnable: Sync {
    /// Execute one invocation of the task
    fn run(&self);
}

impl<F> Runnable for F
where
    F: Fn() + Sync,
{
    fn run(&self) {
        self()
    }
}

/// Opaque handle to a registered task
///
/// Handles are only issued by the registry and stay valid for the lifetime
/// of the scheduler; slots are never reused. A handle carries the tag of
/// the registry that issued it, so another registry rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId {
    owner: usize,
    index: usize,
}

impl TaskId {
    pub(crate) const fn new(owner: usize, index: usize) -> Self {
        TaskId { owner, index }
    }

    pub(crate) const fn owner(self) -> usize {
        self.owner
    }

    pub(crate) const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.index)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "task#{=usize}", self.index);
    }
}

/// Task lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Eligible for selection once due
    Ready,
    /// Body is executing
    Running,
    /// Reserved for blocking semantics; no policy enters it
    Waiting,
    /// Removed; never selected again
    Terminated,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Ready => write!(f, "Ready"),
            TaskState::Running => write!(f, "Running"),
            TaskState::Waiting => write!(f, "Waiting"),
            TaskState::Terminated => write!(f, "Terminated"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TaskState::Ready => defmt::write!(fmt, "Ready"),
            TaskState::Running => defmt::write!(fmt, "Running"),
            TaskState::Waiting => defmt::write!(fmt, "Waiting"),
            TaskState::Terminated => defmt::write!(fmt, "Terminated"),
        }
    }
}

/// Record describing one schedulable unit of work
pub struct TaskControlBlock<'a> {
    body: &'a dyn Runnable,
    interval_ms: u32,
    last_run: Millis,
    state: TaskState,
    priority: TaskPriority,
    run_count: u32,
    /// Body is on the stack, possibly preempted by a nested run
    in_progress: bool,
}

impl<'a> TaskControlBlock<'a> {
    /// Create a ready block that is due on its first evaluation
    pub fn new(body: &'a dyn Runnable, interval_ms: u32, priority: TaskPriority) -> Self {
        Self {
            body,
            interval_ms,
            last_run: Millis::ZERO,
            state: TaskState::Ready,
            priority,
            run_count: 0,
            in_progress: false,
        }
    }

    /// Not terminated, not on the stack, and at least `interval_ms` since
    /// the last run
    ///
    /// A body preempted by a nested run is marked `Ready` but is still
    /// unfinished, so it is not due until it returns. The elapsed time
    /// wraps: a `last_run` later than `now` (only possible with a
    /// non-monotonic clock) makes the task due immediately.
    pub fn is_due(&self, now: Millis) -> bool {
        self.state != TaskState::Terminated
            && !self.in_progress
            && now.has_elapsed(self.last_run, self.interval_ms)
    }

    /// Check if the body has started and not yet returned
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn body(&self) -> &'a dyn Runnable {
        self.body
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn last_run(&self) -> Millis {
        self.last_run
    }

    pub fn run_count(&self) -> u32 {
        self.run_count
    }

    pub(crate) fn begin_run(&mut self) {
        self.in_progress = true;
        if self.state != TaskState::Terminated {
            self.state = TaskState::Running;
        }
    }

    /// Record a completed invocation started at `started`
    ///
    /// A task removed while its body was running stays terminated.
    pub(crate) fn finish_run(&mut self, started: Millis) {
        self.last_run = started;
        self.run_count = self.run_count.wrapping_add(1);
        self.in_progress = false;
        if self.state != TaskState::Terminated {
            self.state = TaskState::Ready;
        }
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.state != TaskState::Terminated {
            self.state = TaskState::Ready;
        }
    }

    pub(crate) fn terminate(&mut self) {
        self.state = TaskState::Terminated;
    }

    pub(crate) fn snapshot(&self, id: TaskId) -> TaskSnapshot {
        TaskSnapshot {
            id,
            state: self.state,
            priority: self.priority,
            interval_ms: self.interval_ms,
            last_run: self.last_run,
            run_count: self.run_count,
        }
    }
}

/// Copy of a task's observable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub state: TaskState,
    pub priority: TaskPriority,
    pub interval_ms: u32,
    pub last_run: Millis,
    pub run_count: u32,
}
