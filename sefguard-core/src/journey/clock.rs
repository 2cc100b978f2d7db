//! Logical scheduler for the journey.
//!
//! The clock decides *when* something fires; it never touches journey state.
//! Tests drive it synchronously with arbitrary elapsed durations, and the host
//! feeds it real elapsed time from its own timer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Safety activation finished; movement begins.
    Activation,
    /// One progress increment.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Logical time at which the timer fires.
    pub due: Duration,
    pub kind: TimerKind,
}

/// Single-slot logical clock. At most one timer is ever pending, so two
/// progress loops cannot coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyClock {
    now: Duration,
    pending: Option<Timer>,
}

impl JourneyClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: None,
        }
    }

    /// Current logical time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub const fn pending(&self) -> Option<Timer> {
        self.pending
    }

    /// Arm a timer `delay` after the current logical time, replacing any
    /// timer already pending. Due times saturate at `Duration::MAX`.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.pending = Some(Timer {
            due: self.now.saturating_add(delay),
            kind,
        });
    }

    /// Cancel the pending timer, returning it if one was armed.
    pub fn cancel(&mut self) -> Option<Timer> {
        self.pending.take()
    }

    /// Pop the pending timer if it is due at or before `deadline`, moving
    /// logical time to its due time.
    pub fn fire_due(&mut self, deadline: Duration) -> Option<Timer> {
        match self.pending {
            Some(timer) if timer.due <= deadline => {
                self.pending = None;
                self.now = self.now.max(timer.due);
                Some(timer)
            }
            _ => None,
        }
    }

    /// Move logical time forward to `deadline` once no timer remains due.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Time left until the pending timer fires.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        self.pending
            .map(|timer| timer.due.saturating_sub(self.now))
    }
}
