//! Runtime configuration of the scheduler driver

use core::fmt;

use tinysched_core::{Millis, DEFAULT_PREEMPT_PERIOD_MS};

/// How the alarm interrupt hands control to the selected task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreemptMode {
    /// Run the selected body inside the interrupt handler
    ///
    /// The interrupted body is still on the stack underneath; call stacks
    /// nest instead of swapping. A long body blocks every other interrupt
    /// of the same level until it returns.
    #[default]
    Nested,
    /// Record the selection and run it from the next `evaluate` call
    Deferred,
}

impl fmt::Display for PreemptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreemptMode::Nested => write!(f, "nested"),
            PreemptMode::Deferred => write!(f, "deferred"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PreemptMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PreemptMode::Nested => defmt::write!(fmt, "nested"),
            PreemptMode::Deferred => defmt::write!(fmt, "deferred"),
        }
    }
}

/// What registration does besides failing when the task table is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowAction {
    /// Log a warning
    #[default]
    Warn,
    /// Stay quiet; the error is still returned
    Silent,
}

#[cfg(feature = "defmt")]
impl defmt::Format for OverflowAction {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OverflowAction::Warn => defmt::write!(fmt, "Warn"),
            OverflowAction::Silent => defmt::write!(fmt, "Silent"),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub name: &'static str,
    /// Period of the preemption alarm
    pub preempt_period: Millis,
    pub preempt_mode: PreemptMode,
    pub overflow: OverflowAction,
}

impl SchedulerConfig {
    pub const DEFAULT: Self = Self {
        name: "tinysched",
        preempt_period: Millis::new(DEFAULT_PREEMPT_PERIOD_MS),
        preempt_mode: PreemptMode::Nested,
        overflow: OverflowAction::Warn,
    };

    /// Creates a new configuration builder.
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::default()
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`SchedulerConfig`]
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl Default for SchedulerConfigBuilder {
    fn default() -> Self {
        Self {
            config: SchedulerConfig::DEFAULT,
        }
    }
}

impl SchedulerConfigBuilder {
    /// Sets the scheduler name used in log records.
    pub const fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Sets the preemption alarm period.
    pub const fn preempt_period(mut self, period: Millis) -> Self {
        self.config.preempt_period = period;
        self
    }

    pub const fn preempt_mode(mut self, mode: PreemptMode) -> Self {
        self.config.preempt_mode = mode;
        self
    }

    pub const fn overflow(mut self, action: OverflowAction) -> Self {
        self.config.overflow = action;
        self
    }

    /// Builds the configuration.
    pub const fn build(self) -> SchedulerConfig {
        self.config
    }
}
