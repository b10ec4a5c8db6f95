//! Single-slot debounce timer
//!
//! Time is supplied by the caller as a monotonic [`Duration`] (time since
//! some fixed start), which keeps the timer deterministic and usable where
//! `std::time::Instant` is unavailable.

use std::time::Duration;

use crate::core::DiagramError;

/// Quiet period after the last edit before an update runs
pub const DEFAULT_QUIET: Duration = Duration::from_millis(300);

/// Convert a millisecond clock reading (such as `performance.now()`) into
/// a timer timestamp
///
/// Negative readings clamp to zero; infinite or out of range ones are
/// rejected.
pub fn timestamp_from_millis(millis: f64) -> Result<Duration, DiagramError> {
    Duration::try_from_secs_f64(millis.max(0.0) / 1000.0)
        .map_err(|_| DiagramError::InvalidTimestamp { millis })
}

/// A delayed task slot holding at most one pending deadline
///
/// Scheduling replaces whatever was pending, so a burst of schedules
/// collapses into one firing `quiet` after the last of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// When the pending task fires, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedule a firing `quiet` after `now`, cancelling any pending one
    ///
    /// Returns true if a pending task was replaced.
    pub fn schedule(&mut self, now: Duration) -> bool {
        self.deadline
            .replace(now.saturating_add(self.quiet))
            .is_some()
    }

    /// Drop the pending task. Returns true if there was one.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Consume the pending task if its deadline has passed
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.schedule(ms(0)));
        assert!(!debouncer.fire(ms(299)));
        assert!(debouncer.fire(ms(300)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(ms(1000)));
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut debouncer = Debouncer::default();
        debouncer.schedule(ms(0));
        assert!(debouncer.schedule(ms(200)));
        assert_eq!(debouncer.deadline(), Some(ms(500)));
        assert!(!debouncer.fire(ms(300)));
        assert!(debouncer.fire(ms(500)));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(!debouncer.cancel());
        debouncer.schedule(ms(10));
        assert!(debouncer.cancel());
        assert!(!debouncer.fire(ms(100)));
    }

    #[test]
    fn test_timestamp_from_millis() {
        assert_eq!(timestamp_from_millis(1500.0).unwrap(), ms(1500));
        assert_eq!(timestamp_from_millis(-20.0).unwrap(), Duration::ZERO);
        assert!(matches!(
            timestamp_from_millis(f64::INFINITY),
            Err(DiagramError::InvalidTimestamp { .. })
        ));
        assert!(timestamp_from_millis(f64::MAX).is_err());
    }

    #[test]
    fn test_schedule_near_end_of_time_saturates() {
        let mut debouncer = Debouncer::default();
        debouncer.schedule(Duration::MAX);
        assert_eq!(debouncer.deadline(), Some(Duration::MAX));
        assert!(debouncer.fire(Duration::MAX));
    }
}
