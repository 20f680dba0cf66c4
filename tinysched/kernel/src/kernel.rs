//! Scheduler driver
//!
//! The driver owns the task table behind a critical section and exposes the
//! entry points of the kernel: policy configuration, task registration,
//! the polled `evaluate` step and the alarm interrupt handler.
//!
//! Task bodies always run outside the critical section, so the alarm
//! interrupt can fire while a body executes. Under [`PreemptMode::Nested`]
//! the interrupt handler runs the selected body on top of the interrupted
//! one: logical preemption without an execution-state swap.

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use critical_section::Mutex;
use log::{debug, info, warn};
use tinysched_core::{AlarmTimer, Clock, Millis, SchedError, SchedResult, TaskPriority};

use crate::config::{OverflowAction, PreemptMode, SchedulerConfig};
use crate::policy::{FirstComeFirstServed, Policy, PriorityFirst, RoundRobin, Selector};
use crate::registry::TaskRegistry;
use crate::task::{Runnable, TaskId, TaskSnapshot, TaskState};

const NO_TASK: usize = usize::MAX;

struct KernelState<'a, T, const N: usize> {
    registry: TaskRegistry<'a, N>,
    policy: Policy,
    round_robin: RoundRobin,
    timer: T,
    timer_armed: bool,
}

/// Periodic task scheduler for a single core
///
/// `N` is the capacity of the task table. The scheduler is const
/// constructible and is normally placed in a `static` so the alarm
/// interrupt handler can reach it.
pub struct Scheduler<'a, C, T, const N: usize> {
    clock: C,
    config: SchedulerConfig,
    state: Mutex<RefCell<KernelState<'a, T, N>>>,
    /// Task whose body is executing. Advisory: only used for preemption
    /// decisions.
    current: AtomicUsize,
    /// Preemption request recorded by the interrupt in deferred mode
    pending: AtomicUsize,
}

impl<'a, C, T, const N: usize> Scheduler<'a, C, T, N>
where
    C: Clock,
    T: AlarmTimer,
{
    /// Create a scheduler with the default configuration
    pub const fn new(clock: C, timer: T) -> Self {
        Self::with_config(clock, timer, SchedulerConfig::DEFAULT)
    }

    pub const fn with_config(clock: C, timer: T, config: SchedulerConfig) -> Self {
        Self {
            clock,
            config,
            state: Mutex::new(RefCell::new(KernelState {
                registry: TaskRegistry::new(),
                policy: Policy::RoundRobin,
                round_robin: RoundRobin::new(),
                timer,
                timer_armed: false,
            })),
            current: AtomicUsize::new(NO_TASK),
            pending: AtomicUsize::new(NO_TASK),
        }
    }

    /// Register a periodic task
    ///
    /// The task starts `Ready` with `last_run = 0`, so it is due on the
    /// first evaluation at or after `interval_ms`. Fails with
    /// [`SchedError::CapacityExceeded`] once `N` tasks exist.
    pub fn register(
        &self,
        body: &'a dyn Runnable,
        interval_ms: u32,
        priority: TaskPriority,
    ) -> SchedResult<TaskId> {
        let result = critical_section::with(|cs| {
            self.state
                .borrow_ref_mut(cs)
                .registry
                .add(body, interval_ms, priority)
        });

        match result {
            Ok(id) => debug!(
                target: "tinysched",
                "{}: registered {} every {}ms at {}",
                self.config.name, id, interval_ms, priority
            ),
            Err(err) if self.config.overflow == OverflowAction::Warn => warn!(
                target: "tinysched",
                "{}: cannot register task: {} (capacity {})",
                self.config.name, err, N
            ),
            Err(_) => {}
        }
        result
    }

    /// Terminate a task
    ///
    /// The task is never selected again. A body that is already running
    /// completes; the task stays terminated afterwards.
    pub fn remove(&self, id: TaskId) -> SchedResult<()> {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).registry.remove(id))?;
        let _ = self.pending.compare_exchange(
            id.index(),
            NO_TASK,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        debug!(target: "tinysched", "{}: removed {}", self.config.name, id);
        Ok(())
    }

    /// Select the active policy
    ///
    /// Selecting [`Policy::Preemptive`] arms the alarm with the configured
    /// period; selecting it again while armed fails with
    /// [`SchedError::TimerAlreadyArmed`]. Switching to any other policy
    /// disarms the alarm.
    pub fn configure(&self, policy: Policy) -> SchedResult<()> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if policy.is_preemptive() {
                if state.timer_armed {
                    return Err(SchedError::TimerAlreadyArmed);
                }
                state.timer.arm_periodic(self.config.preempt_period)?;
                state.timer_armed = true;
            } else if state.timer_armed {
                state.timer.disarm()?;
                state.timer_armed = false;
                self.pending.store(NO_TASK, Ordering::Release);
            }
            state.policy = policy;
            Ok(())
        })?;

        if policy.is_preemptive() {
            info!(
                target: "tinysched",
                "{}: policy {} ({}, alarm every {})",
                self.config.name, policy, self.config.preempt_mode, self.config.preempt_period
            );
        } else {
            info!(target: "tinysched", "{}: policy {}", self.config.name, policy);
        }
        Ok(())
    }

    /// Run one scheduling step from the polling loop
    ///
    /// Runs at most one due task chosen by the active policy and returns
    /// it. Under [`Policy::Preemptive`] this only runs a request left by
    /// the interrupt in deferred mode.
    pub fn evaluate(&self) -> Option<TaskId> {
        let now = self.clock.now();
        let selected = critical_section::with(|cs| {
            let mut guard = self.state.borrow_ref_mut(cs);
            let state = &mut *guard;
            match state.policy {
                Policy::RoundRobin => state.round_robin.select(&state.registry, now),
                Policy::FirstComeFirstServed => FirstComeFirstServed.select(&state.registry, now),
                Policy::Priority => PriorityFirst.select(&state.registry, now),
                Policy::Preemptive => None,
            }
        });

        let selected = selected.or_else(|| self.take_pending());
        selected.filter(|&id| self.dispatch(id, now))
    }

    /// Alarm interrupt entry point
    ///
    /// Only acts under [`Policy::Preemptive`]. Finds the most urgent due
    /// task among those not already on the stack; it is either run right
    /// here with the interrupted task marked `Ready`
    /// ([`PreemptMode::Nested`]) or recorded for the next `evaluate`
    /// ([`PreemptMode::Deferred`]). The pending interrupt is always
    /// acknowledged before returning.
    ///
    /// Returns the task that was run or recorded.
    pub fn on_timer_interrupt(&self) -> Option<TaskId> {
        let now = self.clock.now();
        let current = self.current_task();

        let selected = critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if !state.policy.is_preemptive() {
                return None;
            }
            // bodies on the stack, the interrupted one included, are not due
            let next = PriorityFirst.select(&state.registry, now)?;
            if self.config.preempt_mode == PreemptMode::Nested {
                if let Some(tcb) = current.and_then(|id| state.registry.get_mut(id)) {
                    tcb.mark_ready();
                }
            }
            Some(next)
        });

        let result = match (selected, self.config.preempt_mode) {
            (Some(id), PreemptMode::Nested) => {
                match current {
                    Some(interrupted) => debug!(
                        target: "tinysched",
                        "{}: {} preempts {} at {}",
                        self.config.name, id, interrupted, now
                    ),
                    None => debug!(
                        target: "tinysched",
                        "{}: {} preempts idle at {}",
                        self.config.name, id, now
                    ),
                }
                Some(id).filter(|&id| self.dispatch(id, now))
            }
            (Some(id), PreemptMode::Deferred) => {
                self.pending.store(id.index(), Ordering::Release);
                debug!(
                    target: "tinysched",
                    "{}: {} requested at {}",
                    self.config.name, id, now
                );
                Some(id)
            }
            (None, _) => None,
        };

        critical_section::with(|cs| self.state.borrow_ref_mut(cs).timer.clear_interrupt());
        result
    }

    /// Run one task body to completion outside the critical section
    fn dispatch(&self, id: TaskId, now: Millis) -> bool {
        let body = critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let tcb = state.registry.get_mut(id)?;
            if tcb.state() == TaskState::Terminated || tcb.in_progress() {
                return None;
            }
            tcb.begin_run();
            Some(tcb.body())
        });
        let Some(body) = body else {
            return false;
        };

        debug!(target: "tinysched", "{}: run {} at {}", self.config.name, id, now);
        let interrupted = self.current.swap(id.index(), Ordering::AcqRel);
        body.run();
        self.current.store(interrupted, Ordering::Release);

        critical_section::with(|cs| {
            if let Some(tcb) = self.state.borrow_ref_mut(cs).registry.get_mut(id) {
                tcb.finish_run(now);
            }
        });
        true
    }

    fn take_pending(&self) -> Option<TaskId> {
        self.handle(self.pending.swap(NO_TASK, Ordering::AcqRel))
    }

    fn handle(&self, index: usize) -> Option<TaskId> {
        if index == NO_TASK {
            return None;
        }
        critical_section::with(|cs| self.state.borrow_ref(cs).registry.id_at(index))
    }

    /// Active policy
    pub fn policy(&self) -> Policy {
        critical_section::with(|cs| self.state.borrow_ref(cs).policy)
    }

    /// Number of registered tasks, terminated ones included
    pub fn task_count(&self) -> usize {
        critical_section::with(|cs| self.state.borrow_ref(cs).registry.len())
    }

    /// Maximum number of tasks
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of a task
    pub fn task(&self, id: TaskId) -> Option<TaskSnapshot> {
        critical_section::with(|cs| self.state.borrow_ref(cs).registry.snapshot(id))
    }

    /// Visit a snapshot of every task in registration order
    ///
    /// `f` runs outside the critical section.
    pub fn for_each_task<F: FnMut(TaskSnapshot)>(&self, mut f: F) {
        for index in 0..N {
            let snapshot = critical_section::with(|cs| {
                let state = self.state.borrow_ref(cs);
                let registry = &state.registry;
                registry.id_at(index).and_then(|id| registry.snapshot(id))
            });
            match snapshot {
                Some(snapshot) => f(snapshot),
                None => break,
            }
        }
    }

    /// Task whose body is executing, if any
    pub fn current_task(&self) -> Option<TaskId> {
        self.handle(self.current.load(Ordering::Acquire))
    }

    /// Preemption request waiting for the next `evaluate`
    pub fn pending_preemption(&self) -> Option<TaskId> {
        self.handle(self.pending.load(Ordering::Acquire))
    }

    /// Check if the preemption alarm is running
    pub fn is_timer_armed(&self) -> bool {
        critical_section::with(|cs| self.state.borrow_ref(cs).timer_armed)
    }

    /// Access the alarm timer inside a critical section
    pub fn with_timer<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs).timer))
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;
    use tinysched_core::{ManualClock, NoAlarm};

    #[derive(Default)]
    struct CountingAlarm {
        armed: u32,
        disarmed: u32,
        cleared: u32,
    }

    impl AlarmTimer for CountingAlarm {
        fn arm_periodic(&mut self, _period: Millis) -> SchedResult<()> {
            self.armed += 1;
            Ok(())
        }

        fn disarm(&mut self) -> SchedResult<()> {
            self.disarmed += 1;
            Ok(())
        }

        fn clear_interrupt(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn empty_scheduler_does_nothing() {
        let sched: Scheduler<'_, _, _, 4> = Scheduler::new(ManualClock::default(), NoAlarm);
        assert_eq!(sched.evaluate(), None);
        assert_eq!(sched.task_count(), 0);
        assert_eq!(sched.capacity(), 4);
        assert_eq!(sched.current_task(), None);
    }

    #[test]
    fn evaluate_records_last_run_and_count() {
        let hits = AtomicU32::new(0);
        let body = || {
            hits.fetch_add(1, Ordering::Relaxed);
        };
        let sched: Scheduler<'_, _, _, 4> =
            Scheduler::new(ManualClock::new(Millis::new(300)), NoAlarm);
        let id = sched.register(&body, 100, TaskPriority::new(1)).unwrap();

        assert_eq!(sched.evaluate(), Some(id));
        let snapshot = sched.task(id).unwrap();
        assert_eq!(snapshot.last_run, Millis::new(300));
        assert_eq!(snapshot.run_count, 1);
        assert_eq!(snapshot.state, TaskState::Ready);
        assert_eq!(hits.load(Ordering::Relaxed), 1);

        assert_eq!(sched.evaluate(), None);
        sched.clock().advance(100);
        assert_eq!(sched.evaluate(), Some(id));
    }

    #[test]
    fn current_task_is_set_only_while_running() {
        static SCHED: Scheduler<'static, ManualClock, NoAlarm, 2> =
            Scheduler::new(ManualClock::new(Millis::ZERO), NoAlarm);
        static SEEN: AtomicUsize = AtomicUsize::new(NO_TASK);

        fn observe() {
            if let Some(id) = SCHED.current_task() {
                SEEN.store(id.index(), Ordering::Relaxed);
            }
        }
        static OBSERVE: fn() = observe;

        let id = SCHED.register(&OBSERVE, 0, TaskPriority::new(1)).unwrap();
        assert_eq!(SCHED.evaluate(), Some(id));
        assert_eq!(SEEN.load(Ordering::Relaxed), id.index());
        assert_eq!(SCHED.current_task(), None);
    }

    #[test]
    fn preemptive_configure_arms_once() {
        let sched: Scheduler<'_, _, _, 2> =
            Scheduler::new(ManualClock::default(), CountingAlarm::default());

        sched.configure(Policy::Preemptive).unwrap();
        assert!(sched.is_timer_armed());
        assert_eq!(
            sched.configure(Policy::Preemptive),
            Err(SchedError::TimerAlreadyArmed)
        );
        sched.configure(Policy::Priority).unwrap();
        assert!(!sched.is_timer_armed());
        assert_eq!(sched.policy(), Policy::Priority);

        let (armed, disarmed) = sched.with_timer(|alarm| (alarm.armed, alarm.disarmed));
        assert_eq!((armed, disarmed), (1, 1));
    }

    #[test]
    fn preemptive_without_alarm_keeps_previous_policy() {
        let sched: Scheduler<'_, _, _, 2> = Scheduler::new(ManualClock::default(), NoAlarm);
        sched.configure(Policy::FirstComeFirstServed).unwrap();
        assert_eq!(
            sched.configure(Policy::Preemptive),
            Err(SchedError::TimerUnavailable)
        );
        assert_eq!(sched.policy(), Policy::FirstComeFirstServed);
    }

    #[test]
    fn interrupt_outside_preemptive_only_acknowledges() {
        fn noop() {}
        static NOOP: fn() = noop;

        let sched: Scheduler<'_, _, _, 2> =
            Scheduler::new(ManualClock::default(), CountingAlarm::default());
        sched.register(&NOOP, 0, TaskPriority::new(1)).unwrap();
        sched.configure(Policy::Priority).unwrap();

        assert_eq!(sched.on_timer_interrupt(), None);
        assert_eq!(sched.with_timer(|alarm| alarm.cleared), 1);

        let mut runs = 0;
        sched.for_each_task(|snapshot| runs += snapshot.run_count);
        assert_eq!(runs, 0);
    }
}
