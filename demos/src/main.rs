//! tinysched demonstration on a Linux/Unix host
//!
//! Runs the producer, consumer, critical-section and semaphore tasks under a
//! policy chosen on the command line until Ctrl-C or `--run-secs` elapses.
//!
//! ```text
//! tinysched-demo --policy preemptive --preempt-mode deferred --run-secs 10
//! RUST_LOG=tinysched=debug tinysched-demo --policy fcfs
//! ```

mod workloads;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use tracing_subscriber::EnvFilter;

use tinysched_core::{Millis, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PREEMPT_PERIOD_MS, MAX_TASKS};
use tinysched_kernel::{Policy, PreemptMode, Scheduler, SchedulerConfig};
use tinysched_posix::{run_polling_loop, HostAlarm, HostClock};

type DemoScheduler = Scheduler<'static, HostClock, HostAlarm, MAX_TASKS>;

static SCHED: OnceLock<DemoScheduler> = OnceLock::new();
static RUNNING: AtomicBool = AtomicBool::new(true);

fn on_alarm() {
    if let Some(sched) = SCHED.get() {
        sched.on_timer_interrupt();
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    RoundRobin,
    Fcfs,
    Priority,
    Preemptive,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RoundRobin => Policy::RoundRobin,
            PolicyArg::Fcfs => Policy::FirstComeFirstServed,
            PolicyArg::Priority => Policy::Priority,
            PolicyArg::Preemptive => Policy::Preemptive,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Nested,
    Deferred,
}

impl From<ModeArg> for PreemptMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Nested => PreemptMode::Nested,
            ModeArg::Deferred => PreemptMode::Deferred,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Periodic task scheduler demonstration")]
struct Opts {
    #[arg(long, value_enum, default_value_t = PolicyArg::Priority)]
    policy: PolicyArg,

    /// How the alarm hands over to the selected task under --policy preemptive
    #[arg(long = "preempt-mode", value_enum, default_value_t = ModeArg::Nested)]
    preempt_mode: ModeArg,

    #[arg(long = "preempt-ms", default_value_t = DEFAULT_PREEMPT_PERIOD_MS, value_name = "MS")]
    preempt_ms: u64,

    /// Delay between two evaluations of the polling loop
    #[arg(long = "poll-ms", default_value_t = DEFAULT_POLL_INTERVAL_MS, value_name = "MS")]
    poll_ms: u64,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long = "run-secs", value_name = "SECS")]
    run_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // tracing-subscriber's log bridge picks up every `log` record
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let config = SchedulerConfig::builder()
        .name("demo")
        .preempt_period(Millis::new(opts.preempt_ms))
        .preempt_mode(opts.preempt_mode.into())
        .build();

    let sched = SCHED.get_or_init(|| {
        Scheduler::with_config(HostClock::new(), HostAlarm::new(on_alarm), config)
    });

    let tasks = workloads::register(sched).context("registering demo tasks")?;
    sched
        .configure(opts.policy.into())
        .context("configuring scheduler policy")?;

    ctrlc::set_handler(|| RUNNING.store(false, Ordering::Release))
        .context("installing Ctrl-C handler")?;
    if let Some(secs) = opts.run_secs {
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            RUNNING.store(false, Ordering::Release);
        });
    }

    info!("starting scheduler");
    let stats = run_polling_loop(sched, Duration::from_millis(opts.poll_ms), &RUNNING);

    if sched.is_timer_armed() {
        sched
            .configure(Policy::RoundRobin)
            .context("stopping preemption alarm")?;
    }

    for (name, id) in tasks {
        if let Some(task) = sched.task(id) {
            info!(
                "{}: {} runs, last at {}ms, {}",
                name,
                task.run_count,
                task.last_run.as_millis(),
                task.state
            );
        }
    }
    info!(
        "scheduler stopped after {} evaluations, {} dispatched",
        stats.evaluations, stats.dispatched
    );
    Ok(())
}
