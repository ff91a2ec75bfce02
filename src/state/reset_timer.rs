//! Cancellable deadline for returning from the success view

use std::time::{Duration, Instant};

/// Deadline token for the automatic Succeeded -> Idle reset.
///
/// The timer never fires on its own: the owner polls [`ResetTimer::is_due`]
/// from its event loop. Cancelling or dropping the token discards the
/// deadline, so a reset armed by one submission cannot land on a later one.
#[derive(Debug, Clone)]
pub struct ResetTimer {
    duration: Duration,
    deadline: Option<Instant>,
}

impl ResetTimer {
    /// How long the success view stays up (5 seconds)
    pub const SUCCESS_WINDOW: Duration = Duration::from_millis(5000);

    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    /// Start (or restart) the countdown from `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    /// Discard the pending deadline. Returns true if one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left before the deadline, `None` when not armed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fraction of the window already elapsed, clamped to 0.0..=1.0
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let remaining = self.remaining(now)?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let left = remaining.as_secs_f32() / self.duration.as_secs_f32();
        Some((1.0 - left).clamp(0.0, 1.0))
    }
}

impl Default for ResetTimer {
    fn default() -> Self {
        Self::new(Self::SUCCESS_WINDOW)
    }
}
