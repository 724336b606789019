//! Time abstraction traits for platform-agnostic timing.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// `duration_since` must tolerate counter wraparound for clocks that wrap,
/// otherwise a stimulus lit just before the wrap never expires.
///
/// A wrapping clock can only measure gaps shorter than one counter period
/// (2^32 ms, about 49.7 days, for [`Millis`]). Two readings a whole period
/// apart look identical, so a longer gap between activation and the next
/// poll is seen modulo the period.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}

/// Milliseconds elapsed on a wrapping 32-bit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    const ZERO: Self = MillisDuration(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        MillisDuration(millis.min(u32::MAX as u64) as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        MillisDuration(self.0.saturating_sub(other.0))
    }
}

/// Reading of a free-running 32-bit millisecond counter.
///
/// The counter wraps after ~49.7 days; all arithmetic wraps with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(Millis(self.0.wrapping_add(duration.0)))
    }
}
