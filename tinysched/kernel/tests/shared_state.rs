//! Task bodies coordinating through tinysched-sync primitives while the
//! alarm interrupt preempts them.

use std::sync::Mutex;

use tinysched_kernel::{AlarmTimer, ManualClock, Millis, Policy, SchedResult, Scheduler, TaskPriority};
use tinysched_sync::{EventFlag, Semaphore, SharedQueue};

#[derive(Default)]
struct QuietAlarm;

impl AlarmTimer for QuietAlarm {
    fn arm_periodic(&mut self, _period: Millis) -> SchedResult<()> {
        Ok(())
    }

    fn disarm(&mut self) -> SchedResult<()> {
        Ok(())
    }

    fn clear_interrupt(&mut self) {}
}

#[test]
fn nested_producer_fills_queue_under_running_consumer() {
    static SCHED: Scheduler<'static, ManualClock, QuietAlarm, 4> =
        Scheduler::new(ManualClock::new(Millis::ZERO), QuietAlarm);
    static QUEUE: SharedQueue<u32, 4> = SharedQueue::new();
    static READY: EventFlag = EventFlag::new();
    static SEEN: Mutex<Vec<u32>> = Mutex::new(Vec::new());

    fn producer() {
        QUEUE.push_lossy(7);
        READY.set();
    }
    static PRODUCER: fn() = producer;

    fn consumer() {
        assert!(!READY.check());
        SCHED.clock().advance(500);
        SCHED.on_timer_interrupt();
        if READY.take() {
            SEEN.lock().unwrap().extend(QUEUE.pop());
        }
    }
    static CONSUMER: fn() = consumer;

    SCHED.register(&PRODUCER, 500, TaskPriority::new(1)).unwrap();
    SCHED.register(&CONSUMER, 0, TaskPriority::new(2)).unwrap();
    SCHED.configure(Policy::Preemptive).unwrap();

    SCHED.on_timer_interrupt();
    assert_eq!(*SEEN.lock().unwrap(), vec![7]);
    assert!(QUEUE.is_empty());
}

#[test]
fn semaphore_handover_between_polled_tasks() {
    static RESOURCE: Semaphore = Semaphore::new(1);
    static HOLDS: Mutex<Vec<isize>> = Mutex::new(Vec::new());

    fn holder() {
        RESOURCE.wait();
        HOLDS.lock().unwrap().push(RESOURCE.count());
        RESOURCE.signal();
    }
    static HOLDER: fn() = holder;

    let sched: Scheduler<'_, _, _, 4> = Scheduler::new(ManualClock::default(), QuietAlarm);
    sched.register(&HOLDER, 0, TaskPriority::new(1)).unwrap();
    sched.register(&HOLDER, 0, TaskPriority::new(1)).unwrap();

    for _ in 0..4 {
        sched.evaluate();
    }
    assert_eq!(*HOLDS.lock().unwrap(), vec![0; 4]);
    assert_eq!(RESOURCE.count(), 1);
}
