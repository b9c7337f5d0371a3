//! Failed-attempt accounting.
//!
//! One mutex guards both the counter and the locked flag, so the increment and
//! the threshold comparison are a single critical section. Once locked, the
//! tracker never unlocks; only a process restart clears it.

use parking_lot::Mutex;

/// Snapshot returned by [`AttemptTracker::increment_and_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptStatus {
    /// Consecutive failed attempts after this update.
    pub count: u32,
    /// Whether the limit has been reached.
    pub locked: bool,
    /// Whether this call is the one that crossed the limit.
    pub newly_locked: bool,
}

#[derive(Debug, Default)]
struct TrackerState {
    failed: u32,
    locked: bool,
}

/// Process-lifetime counter of consecutive failed recovery attempts.
#[derive(Debug)]
pub struct AttemptTracker {
    max_attempts: u32,
    state: Mutex<TrackerState>,
}

impl AttemptTracker {
    /// Create a tracker that locks after `max_attempts` failures.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Configured limit.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Record one failure and report whether the limit is reached.
    ///
    /// Once locked, further calls leave the count unchanged.
    pub fn increment_and_check(&self) -> AttemptStatus {
        let mut state = self.state.lock();
        if state.locked {
            return AttemptStatus {
                count: state.failed,
                locked: true,
                newly_locked: false,
            };
        }

        state.failed = state.failed.saturating_add(1);
        let newly_locked = state.failed >= self.max_attempts;
        state.locked = newly_locked;

        AttemptStatus {
            count: state.failed,
            locked: newly_locked,
            newly_locked,
        }
    }

    /// Clear the failure count after a successful recovery.
    ///
    /// Returns `false` and changes nothing if the tracker is already locked.
    pub fn reset(&self) -> bool {
        let mut state = self.state.lock();
        if state.locked {
            return false;
        }
        state.failed = 0;
        true
    }

    /// Whether the limit has been reached.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    /// Current failure count.
    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.state.lock().failed
    }

    /// Attempts left before lockout.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        let state = self.state.lock();
        if state.locked {
            0
        } else {
            self.max_attempts.saturating_sub(state.failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn locks_on_the_configured_attempt() {
        let tracker = AttemptTracker::new(3);

        let first = tracker.increment_and_check();
        assert_eq!((first.count, first.locked), (1, false));
        assert_eq!(tracker.remaining(), 2);

        let second = tracker.increment_and_check();
        assert_eq!((second.count, second.locked), (2, false));

        let third = tracker.increment_and_check();
        assert_eq!(
            third,
            AttemptStatus {
                count: 3,
                locked: true,
                newly_locked: true
            }
        );
        assert!(tracker.is_locked());
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn locked_tracker_stops_counting() {
        let tracker = AttemptTracker::new(1);
        assert!(tracker.increment_and_check().newly_locked);

        let again = tracker.increment_and_check();
        assert_eq!(
            again,
            AttemptStatus {
                count: 1,
                locked: true,
                newly_locked: false
            }
        );
    }

    #[test]
    fn reset_clears_failures_but_never_unlocks() {
        let tracker = AttemptTracker::new(3);
        tracker.increment_and_check();
        tracker.increment_and_check();
        assert!(tracker.reset());
        assert_eq!(tracker.failed_attempts(), 0);
        assert_eq!(tracker.remaining(), 3);

        for _ in 0..3 {
            tracker.increment_and_check();
        }
        assert!(!tracker.reset());
        assert!(tracker.is_locked());
    }

    #[test]
    fn concurrent_failures_lock_exactly_once() {
        let tracker = Arc::new(AttemptTracker::new(3));
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || tracker.increment_and_check())
            })
            .collect();

        let statuses: Vec<AttemptStatus> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(statuses.iter().filter(|s| s.newly_locked).count(), 1);
        assert_eq!(statuses.iter().filter(|s| !s.locked).count(), 2);
        assert_eq!(tracker.failed_attempts(), 3);
    }
}
