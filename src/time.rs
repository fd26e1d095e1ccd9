//! Time abstraction traits for platform-agnostic timing.
//!
//! Every timer in the crate is expressed as "elapsed ≥ threshold" against a
//! monotonic millisecond clock, so irregular poll intervals never skip or
//! double a transition.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations should saturate to zero if `earlier` is in the future.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Returns true once at least `threshold` has passed since `since`.
    #[inline]
    fn has_elapsed(&self, since: Self, threshold: Self::Duration) -> bool {
        self.duration_since(since).as_millis() >= threshold.as_millis()
    }
}
