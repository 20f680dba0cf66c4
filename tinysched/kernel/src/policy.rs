//! Dispatch policies
//!
//! Every policy chooses at most one due task per evaluation. The due
//! predicate lives on the task control block; selectors only decide
//! ordering.

use core::fmt;

use tinysched_core::Millis;

use crate::registry::TaskRegistry;
use crate::task::TaskId;

/// Scheduling policy of a [`Scheduler`](crate::Scheduler)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Rotating cursor, one slot per evaluation
    #[default]
    RoundRobin,
    /// First due task in registration order
    FirstComeFirstServed,
    /// Most urgent due task
    Priority,
    /// Most urgent due task, selected from the alarm interrupt
    Preemptive,
}

impl Policy {
    /// Check if the policy is driven by the alarm interrupt
    pub const fn is_preemptive(self) -> bool {
        matches!(self, Policy::Preemptive)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::RoundRobin => write!(f, "round-robin"),
            Policy::FirstComeFirstServed => write!(f, "fcfs"),
            Policy::Priority => write!(f, "priority"),
            Policy::Preemptive => write!(f, "preemptive"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Policy {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Policy::RoundRobin => defmt::write!(fmt, "round-robin"),
            Policy::FirstComeFirstServed => defmt::write!(fmt, "fcfs"),
            Policy::Priority => defmt::write!(fmt, "priority"),
            Policy::Preemptive => defmt::write!(fmt, "preemptive"),
        }
    }
}

/// Strategy that picks the next task to run
pub trait Selector {
    /// Choose at most one due task
    fn select<const N: usize>(&mut self, registry: &TaskRegistry<'_, N>, now: Millis)
        -> Option<TaskId>;
}

/// Round-robin selection
///
/// The cursor advances on every evaluation whether or not the task under
/// it was due, so a task waits at most one full rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Slot examined by the next evaluation
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Selector for RoundRobin {
    fn select<const N: usize>(
        &mut self,
        registry: &TaskRegistry<'_, N>,
        now: Millis,
    ) -> Option<TaskId> {
        let count = registry.len();
        if count == 0 {
            return None;
        }

        let index = self.cursor % count;
        self.cursor = (index + 1) % count;

        let id = registry.id_at(index)?;
        registry
            .get(id)
            .filter(|tcb| tcb.is_due(now))
            .map(|_| id)
    }
}

/// First-come-first-served selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstComeFirstServed;

impl Selector for FirstComeFirstServed {
    fn select<const N: usize>(
        &mut self,
        registry: &TaskRegistry<'_, N>,
        now: Millis,
    ) -> Option<TaskId> {
        registry.due(now).map(|(id, _)| id).next()
    }
}

/// Most-urgent-first selection
///
/// Scans the whole table once; on equal priority the earlier registration
/// wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityFirst;

impl Selector for PriorityFirst {
    fn select<const N: usize>(
        &mut self,
        registry: &TaskRegistry<'_, N>,
        now: Millis,
    ) -> Option<TaskId> {
        let mut best = None;
        for (id, tcb) in registry.due(now) {
            match best {
                Some((_, priority)) if !tcb.priority().is_more_urgent_than(priority) => {}
                _ => best = Some((id, tcb.priority())),
            }
        }
        best.map(|(id, _)| id)
    }
}
