//! # Rate limiting
//! Scroll events arrive far more often than the page needs to react to them. Two classic helpers
//! bound how often the work actually runs:
//! * a **throttle** runs immediately, then ignores every trigger until its window has passed;
//! * a **debounce** waits for a quiet period: each trigger pushes the deadline back, and the work
//! runs once the deadline is reached without a newer trigger.
//!
//! Instead of closures over hidden timer handles, both are plain state machines asked
//! `should_run(now)`. The caller owns the clock, which keeps them trivially testable.
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    reopens_at: Option<Duration>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            reopens_at: None,
        }
    }

    /// Returns `true` if the throttled work should run for a trigger observed at `now`.
    /// A `true` answer closes the window until `now + window`.
    pub fn should_run(&mut self, now: Duration) -> bool {
        match self.reopens_at {
            Some(reopens_at) if now < reopens_at => false,
            _ => {
                self.reopens_at = Some(now + self.window);
                true
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Debounce {
    quiet_period: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Records a trigger, pushing the deadline to `now + quiet_period`.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now + self.quiet_period);
    }

    /// Returns `true` exactly once after the quiet period following the last trigger has elapsed.
    pub fn should_run(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// When the pending run becomes due, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
