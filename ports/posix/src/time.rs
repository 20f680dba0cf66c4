//! Wall-clock time source and thread-backed alarm for hosts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use tinysched_core::{AlarmTimer, Clock, Millis, SchedError, SchedResult};

/// Milliseconds since the first reading
#[derive(Debug, Default)]
pub struct HostClock {
    epoch: OnceLock<Instant>,
}

impl HostClock {
    pub const fn new() -> Self {
        Self {
            epoch: OnceLock::new(),
        }
    }
}

impl Clock for HostClock {
    fn now(&self) -> Millis {
        let epoch = self.epoch.get_or_init(Instant::now);
        Millis::new(epoch.elapsed().as_millis() as u64)
    }
}

/// Interrupt handler invoked by [`HostAlarm`]
pub type AlarmHandler = fn();

/// Periodic alarm simulated by a dedicated thread
///
/// The thread sleeps until the next absolute deadline and then calls the
/// bound handler, which plays the role of the timer interrupt service
/// routine. Unlike a single-core target, the handler runs in parallel with
/// the polling loop.
#[derive(Debug)]
pub struct HostAlarm {
    handler: AlarmHandler,
    running: Option<Arc<AtomicBool>>,
    acknowledged: u64,
}

impl HostAlarm {
    /// Create a disarmed alarm bound to `handler`
    pub const fn new(handler: AlarmHandler) -> Self {
        Self {
            handler,
            running: None,
            acknowledged: 0,
        }
    }

    /// Number of interrupts the handler acknowledged
    pub fn acknowledged(&self) -> u64 {
        self.acknowledged
    }

    pub fn is_armed(&self) -> bool {
        self.running.is_some()
    }
}

impl AlarmTimer for HostAlarm {
    fn arm_periodic(&mut self, period: Millis) -> SchedResult<()> {
        if self.running.is_some() {
            return Err(SchedError::TimerAlreadyArmed);
        }

        let running = Arc::new(AtomicBool::new(true));
        let period = Duration::from_millis(period.as_millis());
        let handler = self.handler;
        let flag = Arc::clone(&running);

        thread::Builder::new()
            .name("tinysched-alarm".into())
            .spawn(move || alarm_thread(period, handler, &flag))
            .map_err(|err| {
                log::error!(target: "tinysched", "failed to spawn alarm thread: {}", err);
                SchedError::Timer
            })?;

        log::debug!(target: "tinysched", "alarm armed every {}ms", period.as_millis());
        self.running = Some(running);
        Ok(())
    }

    fn disarm(&mut self) -> SchedResult<()> {
        // The thread may be blocked on the critical section held by our
        // caller, so it is signalled and left to exit on its next wake-up.
        if let Some(running) = self.running.take() {
            running.store(false, Ordering::Release);
            log::debug!(target: "tinysched", "alarm disarmed");
        }
        Ok(())
    }

    fn clear_interrupt(&mut self) {
        self.acknowledged += 1;
    }
}

impl Drop for HostAlarm {
    fn drop(&mut self) {
        let _ = self.disarm();
    }
}

fn alarm_thread(period: Duration, handler: AlarmHandler, running: &AtomicBool) {
    let mut deadline = Instant::now();

    while running.load(Ordering::Acquire) {
        deadline += period;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }

        if !running.load(Ordering::Acquire) {
            break;
        }
        handler();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn host_clock_starts_near_zero_and_advances() {
        let clock = HostClock::new();
        let first = clock.now();
        assert!(first.as_millis() < 50);

        thread::sleep(Duration::from_millis(20));
        let second = clock.now();
        assert!(second.elapsed_since(first) >= 20);
    }

    #[test]
    fn alarm_calls_handler_periodically() {
        static CALLS: AtomicU64 = AtomicU64::new(0);

        fn on_alarm() {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let mut alarm = HostAlarm::new(on_alarm);
        alarm.arm_periodic(Millis::new(10)).unwrap();
        assert!(alarm.is_armed());

        thread::sleep(Duration::from_millis(105));
        alarm.disarm().unwrap();
        thread::sleep(Duration::from_millis(20));

        let calls = CALLS.load(Ordering::SeqCst);
        assert!((5..=12).contains(&calls), "expected ~10 alarms, got {calls}");

        // no more interrupts once disarmed
        thread::sleep(Duration::from_millis(30));
        assert_eq!(CALLS.load(Ordering::SeqCst), calls);
    }

    #[test]
    fn alarm_refuses_second_arm() {
        fn ignore() {}

        let mut alarm = HostAlarm::new(ignore);
        alarm.arm_periodic(Millis::new(1_000)).unwrap();
        assert_eq!(
            alarm.arm_periodic(Millis::new(1_000)),
            Err(SchedError::TimerAlreadyArmed)
        );
        alarm.disarm().unwrap();
        assert!(!alarm.is_armed());
    }

    #[test]
    fn clear_interrupt_counts_acknowledgements() {
        fn ignore() {}

        let mut alarm = HostAlarm::new(ignore);
        alarm.clear_interrupt();
        alarm.clear_interrupt();
        assert_eq!(alarm.acknowledged(), 2);
    }
}
