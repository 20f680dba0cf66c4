//! Task priorities

use core::fmt;

/// Task priority on an inverted scale
///
/// A numerically smaller value is more urgent. Equal priorities are broken by
/// registration order, which the registry preserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskPriority(i32);

impl TaskPriority {
    /// Most urgent priority
    pub const HIGHEST: TaskPriority = TaskPriority(i32::MIN);

    /// Least urgent priority
    pub const LOWEST: TaskPriority = TaskPriority(i32::MAX);

    /// Create a priority from its raw value
    pub const fn new(priority: i32) -> Self {
        TaskPriority(priority)
    }

    /// Get the raw priority value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Strictly more urgent than `other`
    pub const fn is_more_urgent_than(self, other: TaskPriority) -> bool {
        self.0 < other.0
    }
}

impl From<i32> for TaskPriority {
    fn from(priority: i32) -> Self {
        TaskPriority(priority)
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskPriority {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Priority({})", self.0);
    }
}

/// Macro to create compile-time priority constants
#[macro_export]
macro_rules! priority {
    ($value:literal) => {
        $crate::TaskPriority::new($value)
    };
}
