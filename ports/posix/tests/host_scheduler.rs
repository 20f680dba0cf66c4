//! Scheduler running on the host clock and alarm thread.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use tinysched_kernel::{Millis, NoAlarm, Policy, Scheduler, SchedulerConfig, TaskPriority};
use tinysched_posix::{run_polling_loop, HostAlarm, HostClock};
use tinysched_sync::{EventFlag, SharedQueue};

const FAST_ALARM: SchedulerConfig = SchedulerConfig {
    preempt_period: Millis::new(10),
    ..SchedulerConfig::DEFAULT
};

#[test]
fn preemptive_policy_runs_from_alarm_thread() {
    static SCHED: Scheduler<'static, HostClock, HostAlarm, 4> =
        Scheduler::with_config(HostClock::new(), HostAlarm::new(on_alarm), FAST_ALARM);
    static TICKS: AtomicU32 = AtomicU32::new(0);

    fn on_alarm() {
        SCHED.on_timer_interrupt();
    }

    fn tick() {
        TICKS.fetch_add(1, Ordering::SeqCst);
    }
    static TICK: fn() = tick;

    let id = SCHED.register(&TICK, 20, TaskPriority::new(1)).unwrap();
    SCHED.configure(Policy::Preemptive).unwrap();

    // evaluate is a no-op under the preemptive policy
    let keep_running = AtomicBool::new(true);
    thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(200));
            keep_running.store(false, Ordering::Release);
        });
        let stats = run_polling_loop(&SCHED, Duration::from_millis(5), &keep_running);
        assert_eq!(stats.dispatched, 0);
    });

    SCHED.configure(Policy::RoundRobin).unwrap();
    // let an interrupt that was already in flight finish
    thread::sleep(Duration::from_millis(50));
    let runs = TICKS.load(Ordering::SeqCst);
    assert!(runs >= 3, "expected several alarm-driven runs, got {runs}");
    assert_eq!(SCHED.task(id).map(|t| t.run_count), Some(runs));
    assert!(SCHED.with_timer(|alarm| alarm.acknowledged()) >= u64::from(runs));
}

#[test]
fn producer_and_consumer_hand_over_through_queue() {
    static QUEUE: SharedQueue<u32, 10> = SharedQueue::new();
    static DATA_READY: EventFlag = EventFlag::new();
    static PRODUCED: AtomicU32 = AtomicU32::new(0);
    static CONSUMED: AtomicU32 = AtomicU32::new(0);

    fn producer() {
        let data = PRODUCED.fetch_add(1, Ordering::SeqCst);
        QUEUE.push_lossy(data);
        DATA_READY.set();
    }
    static PRODUCER: fn() = producer;

    fn consumer() {
        if DATA_READY.check() {
            while QUEUE.pop().is_some() {
                CONSUMED.fetch_add(1, Ordering::SeqCst);
            }
            DATA_READY.clear();
        }
    }
    static CONSUMER: fn() = consumer;

    let sched: Scheduler<'_, HostClock, _, 4> =
        Scheduler::new(HostClock::new(), NoAlarm);
    sched.register(&PRODUCER, 10, TaskPriority::new(2)).unwrap();
    sched.register(&CONSUMER, 15, TaskPriority::new(1)).unwrap();
    sched.configure(Policy::RoundRobin).unwrap();

    let keep_running = AtomicBool::new(true);
    thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(200));
            keep_running.store(false, Ordering::Release);
        });
        run_polling_loop(&sched, Duration::from_millis(2), &keep_running);
    });

    // drain whatever the last producer run left behind
    consumer();
    assert!(PRODUCED.load(Ordering::SeqCst) > 0);
    assert_eq!(
        CONSUMED.load(Ordering::SeqCst),
        PRODUCED.load(Ordering::SeqCst)
    );
}
