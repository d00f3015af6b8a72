//! Time source for deferred playback work.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Abstraction over wall time. Every deferred callback in a playback session
/// is scheduled against this clock.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `now + delay`, saturating to `now` if `delay` does not fit a `TimeDelta`.
#[must_use]
pub fn deadline(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deadline_adds_delay() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        let due = deadline(now, Duration::from_millis(500));

        assert_eq!(due - now, TimeDelta::milliseconds(500));
    }

    #[test]
    fn test_deadline_saturates_on_overflow() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        assert_eq!(deadline(now, Duration::MAX), now);
    }
}
