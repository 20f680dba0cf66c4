//! Millisecond time stamps and intervals

use core::fmt;

/// Monotonic time stamp in milliseconds
///
/// The scheduler only ever compares time stamps through
/// [`Millis::elapsed_since`], which uses wrapping subtraction. A stamp that
/// appears to lie in the future therefore reads as a huge elapsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(u64);

impl Millis {
    /// Time zero, the initial `last_run` of every task
    pub const ZERO: Self = Self(0);

    /// Largest representable time stamp
    pub const MAX: Self = Self(u64::MAX);

    /// Create a time stamp from raw milliseconds
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Create a time stamp from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Get the raw millisecond value
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (wrapping)
    pub const fn elapsed_since(self, earlier: Millis) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Add milliseconds, wrapping on overflow
    pub const fn wrapping_add(self, ms: u64) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Check whether `interval` milliseconds have elapsed since `earlier`
    pub const fn has_elapsed(self, earlier: Millis, interval: u32) -> bool {
        self.elapsed_since(earlier) >= interval as u64
    }
}

impl From<u64> for Millis {
    fn from(ms: u64) -> Self {
        Self(ms)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Millis {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u64}ms", self.0);
    }
}

/// Macro to create compile-time time stamps
#[macro_export]
macro_rules! millis {
    ($value:literal ms) => {
        $crate::Millis::new($value)
    };
    ($value:literal s) => {
        $crate::Millis::from_secs($value)
    };
}
