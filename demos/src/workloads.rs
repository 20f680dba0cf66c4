//! The four demonstration tasks
//!
//! Each task is a plain function over process-wide primitives, registered
//! with the intervals and priorities of the reference board application.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tinysched_core::{priority, AlarmTimer, Clock, SchedResult, MAX_QUEUE_SIZE};
use tinysched_kernel::{Scheduler, TaskId};
use tinysched_sync::{EventFlag, Semaphore, SharedQueue, SpinLock};

static QUEUE: SharedQueue<u32, MAX_QUEUE_SIZE> = SharedQueue::new();
static DATA_READY: EventFlag = EventFlag::new();
static RESOURCE: Semaphore = Semaphore::new(1);
static CRITICAL: SpinLock = SpinLock::new();

const HOLD_TIME: Duration = Duration::from_millis(500);

/// Busy-wait like a ROM delay routine; the core does nothing else meanwhile
fn busy_delay(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        core::hint::spin_loop();
    }
}

fn producer() {
    static NEXT: AtomicU32 = AtomicU32::new(0);

    let data = NEXT.fetch_add(1, Ordering::Relaxed);
    if QUEUE.push_lossy(data) {
        log::info!(target: "producer", "produced {}", data);
    } else {
        log::warn!(target: "producer", "queue full, dropped {}", data);
    }
    DATA_READY.set();
}

fn consumer() {
    if DATA_READY.check() {
        match QUEUE.pop() {
            Some(data) => log::info!(target: "consumer", "consumed {}", data),
            None => log::info!(target: "consumer", "flag set but queue empty"),
        }
        DATA_READY.clear();
    }
}

fn critical() {
    let _guard = CRITICAL.guard();
    log::info!(target: "critical", "in critical section");
    busy_delay(HOLD_TIME);
}

fn semaphore_holder() {
    RESOURCE.wait();
    log::info!(target: "semaphore", "accessing shared resource");
    busy_delay(HOLD_TIME);
    RESOURCE.signal();
}

static PRODUCER: fn() = producer;
static CONSUMER: fn() = consumer;
static CRITICAL_TASK: fn() = critical;
static SEMAPHORE_TASK: fn() = semaphore_holder;

/// Register the four tasks in their reference order
pub fn register<C, T, const N: usize>(
    scheduler: &Scheduler<'static, C, T, N>,
) -> SchedResult<[(&'static str, TaskId); 4]>
where
    C: Clock,
    T: AlarmTimer,
{
    Ok([
        ("producer", scheduler.register(&PRODUCER, 1_000, priority!(2))?),
        ("consumer", scheduler.register(&CONSUMER, 1_500, priority!(1))?),
        ("critical", scheduler.register(&CRITICAL_TASK, 2_000, priority!(3))?),
        ("semaphore", scheduler.register(&SEMAPHORE_TASK, 2_500, priority!(4))?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinysched_core::{ManualClock, NoAlarm, MAX_TASKS};

    #[test]
    fn registers_reference_task_set() {
        let sched: Scheduler<'static, ManualClock, NoAlarm, MAX_TASKS> =
            Scheduler::new(ManualClock::default(), NoAlarm);
        let tasks = register(&sched).unwrap();

        let intervals: Vec<_> = tasks
            .iter()
            .filter_map(|(_, id)| sched.task(*id))
            .map(|task| (task.interval_ms, task.priority.raw()))
            .collect();
        assert_eq!(
            intervals,
            vec![(1_000, 2), (1_500, 1), (2_000, 3), (2_500, 4)]
        );
    }

    #[test]
    fn consumer_takes_what_producer_left() {
        producer();
        assert!(DATA_READY.check());
        assert_eq!(QUEUE.len(), 1);

        consumer();
        assert!(!DATA_READY.check());
        assert!(QUEUE.is_empty());

        // nothing to do without the flag
        consumer();
        assert!(QUEUE.is_empty());
    }
}
