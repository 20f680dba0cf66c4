//! Fixed-capacity task table

use core::sync::atomic::{AtomicUsize, Ordering};

use heapless::Vec;
use tinysched_core::{Millis, SchedError, SchedResult, TaskPriority};

use crate::task::{Runnable, TaskControlBlock, TaskId, TaskSnapshot, TaskState};

/// Insertion-ordered table of task control blocks
///
/// Registration order is stable and is the tie-break for every policy.
/// Removal marks a block terminated; the slot is never compacted or reused.
pub struct TaskRegistry<'a, const N: usize> {
    /// Tag stamped into issued handles; 0 until the first registration
    owner: usize,
    tasks: Vec<TaskControlBlock<'a>, N>,
}

/// Source of registry tags, shared by every registry in the program
static NEXT_OWNER: AtomicUsize = AtomicUsize::new(1);

impl<'a, const N: usize> TaskRegistry<'a, N> {
    /// Create a new empty registry
    pub const fn new() -> Self {
        Self {
            owner: 0,
            tasks: Vec::new(),
        }
    }

    fn owner(&mut self) -> usize {
        if self.owner == 0 {
            self.owner = NEXT_OWNER.fetch_add(1, Ordering::Relaxed);
        }
        self.owner
    }

    fn slot(&self, id: TaskId) -> Option<usize> {
        (self.owner != 0 && id.owner() == self.owner).then_some(id.index())
    }

    /// Append a ready task with `last_run = 0`
    pub fn add(
        &mut self,
        body: &'a dyn Runnable,
        interval_ms: u32,
        priority: TaskPriority,
    ) -> SchedResult<TaskId> {
        if self.tasks.is_full() {
            return Err(SchedError::CapacityExceeded);
        }
        let id = TaskId::new(self.owner(), self.tasks.len());
        self.tasks
            .push(TaskControlBlock::new(body, interval_ms, priority))
            .map_err(|_| SchedError::CapacityExceeded)?;
        Ok(id)
    }

    /// Terminate a task
    pub fn remove(&mut self, id: TaskId) -> SchedResult<()> {
        let tcb = self.get_mut(id).ok_or(SchedError::UnknownTask)?;
        tcb.terminate();
        Ok(())
    }

    /// Get a task by handle
    ///
    /// Handles issued by another registry are unknown here.
    pub fn get(&self, id: TaskId) -> Option<&TaskControlBlock<'a>> {
        self.tasks.get(self.slot(id)?)
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskControlBlock<'a>> {
        let slot = self.slot(id)?;
        self.tasks.get_mut(slot)
    }

    /// Handle of the task in slot `index`, if that slot is occupied
    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        (index < self.tasks.len()).then(|| TaskId::new(self.owner, index))
    }

    /// Iterate over all tasks in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &TaskControlBlock<'a>)> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .map(move |(index, tcb)| (TaskId::new(self.owner, index), tcb))
    }

    /// Iterate over the tasks that are due at `now`, in registration order
    pub fn due(&self, now: Millis) -> impl Iterator<Item = (TaskId, &TaskControlBlock<'a>)> + '_ {
        self.iter().filter(move |(_, tcb)| tcb.is_due(now))
    }

    /// Number of occupied slots, terminated tasks included
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no task was ever registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.tasks.is_full()
    }

    /// Number of tasks that are not terminated
    pub fn active_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|tcb| tcb.state() != TaskState::Terminated)
            .count()
    }

    /// Maximum number of tasks
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of a task's observable fields
    pub fn snapshot(&self, id: TaskId) -> Option<TaskSnapshot> {
        self.get(id).map(|tcb| tcb.snapshot(id))
    }
}

impl<'a, const N: usize> Default for TaskRegistry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}
