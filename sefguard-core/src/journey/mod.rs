//! Journey progression: clock configuration, scheduler, transition function,
//! events, observers, and the session that binds them to one state.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{ACTIVATION_DELAY_MS, PROGRESS_MAX, PROGRESS_STEP, TICK_INTERVAL_MS};

pub mod clock;
pub mod event;
pub mod machine;
pub mod observer;
pub mod session;

pub use clock::{JourneyClock, Timer, TimerKind};
pub use event::{EventSet, JourneyEvent, JourneyEventKind};
pub use machine::{JourneyPhase, Transition};
pub use observer::{EventLog, JourneyObserver, SubscriptionId};
pub use session::JourneySession;

/// Errors raised when clock configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockConfigError {
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("progress step must be between 1 and {max} (got {value})")]
    ProgressStepRange { value: u8, max: u8 },
    #[error("clock config JSON is malformed: {0}")]
    Parse(String),
}

/// Pacing of the scripted journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Delay between safety activation and the first movement.
    #[serde(default = "ClockConfig::default_activation_delay_ms")]
    pub activation_delay_ms: u64,
    /// Interval between progress ticks.
    #[serde(default = "ClockConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Percentage points added per tick.
    #[serde(default = "ClockConfig::default_progress_step")]
    pub progress_step: u8,
}

impl ClockConfig {
    const fn default_activation_delay_ms() -> u64 {
        ACTIVATION_DELAY_MS
    }

    const fn default_tick_interval_ms() -> u64 {
        TICK_INTERVAL_MS
    }

    const fn default_progress_step() -> u8 {
        PROGRESS_STEP
    }

    #[must_use]
    pub const fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }

    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Number of ticks from the first movement to arrival.
    #[must_use]
    pub const fn ticks_to_arrival(&self) -> u32 {
        let step = if self.progress_step == 0 { 1 } else { self.progress_step as u32 };
        (PROGRESS_MAX as u32).div_ceil(step)
    }

    /// Logical time from `start_journey` to arrival.
    #[must_use]
    pub fn journey_duration(&self) -> Duration {
        self.activation_delay() + self.tick_interval() * self.ticks_to_arrival()
    }

    /// Validate pacing values.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick interval is zero or the step falls outside
    /// `1..=100`.
    pub const fn validate(&self) -> Result<(), ClockConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ClockConfigError::ZeroTickInterval);
        }
        if self.progress_step == 0 || self.progress_step > PROGRESS_MAX {
            return Err(ClockConfigError::ProgressStepRange {
                value: self.progress_step,
                max: PROGRESS_MAX,
            });
        }
        Ok(())
    }

    /// Parse and validate a config from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ClockConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ClockConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: Self::default_activation_delay_ms(),
            tick_interval_ms: Self::default_tick_interval_ms(),
            progress_step: Self::default_progress_step(),
        }
    }
}
