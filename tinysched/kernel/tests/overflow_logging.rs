//! Capacity overflow is reported through the `log` facade.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tinysched_kernel::{
    ManualClock, NoAlarm, OverflowAction, SchedError, Scheduler, SchedulerConfig, TaskPriority,
};

struct Capture;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static CAPTURE: Capture = Capture;

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target() == "tinysched"
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            RECORDS
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn warnings_from(name: &str) -> Vec<String> {
    let prefix = format!("{name}: ");
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, message)| *level == Level::Warn && message.starts_with(&prefix))
        .map(|(_, message)| message.clone())
        .collect()
}

fn overflow(name: &'static str, overflow: OverflowAction) -> SchedError {
    fn noop() {}
    static NOOP: fn() = noop;

    let config = SchedulerConfig::builder().name(name).overflow(overflow).build();
    let sched: Scheduler<'_, _, _, 1> =
        Scheduler::with_config(ManualClock::default(), NoAlarm, config);
    sched.register(&NOOP, 0, TaskPriority::new(1)).unwrap();
    sched
        .register(&NOOP, 0, TaskPriority::new(1))
        .unwrap_err()
}

#[test]
fn overflow_warns_unless_silenced() {
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(LevelFilter::Trace);

    assert_eq!(overflow("loud", OverflowAction::Warn), SchedError::CapacityExceeded);
    let warnings = warnings_from("loud");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("capacity 1"), "{}", warnings[0]);

    assert_eq!(overflow("quiet", OverflowAction::Silent), SchedError::CapacityExceeded);
    assert!(warnings_from("quiet").is_empty());

    // the successful registrations are still logged
    assert!(RECORDS
        .lock()
        .unwrap()
        .iter()
        .any(|(level, message)| *level == Level::Debug && message.starts_with("quiet: registered")));
}
