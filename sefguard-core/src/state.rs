use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    PROGRESS_MAX, SEED_BUBBLE_STRENGTH, SEED_DISTANCE, SEED_ESTIMATED_TIME,
    SEED_JOURNEY_START_TIME, SEED_RESPONDER_COUNT, SEED_SAFE_HAVEN_COUNT, SEED_SAFETY_SCORE,
};

/// Coarse phase of the simulated trip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyStep {
    #[default]
    Start,
    SafetyActive,
    Journey,
    Arrival,
}

impl JourneyStep {
    pub const ALL: [Self; 4] = [Self::Start, Self::SafetyActive, Self::Journey, Self::Arrival];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SafetyActive => "safety-active",
            Self::Journey => "journey",
            Self::Arrival => "arrival",
        }
    }

    /// One-based position of the step in the fixed journey sequence.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Start => 1,
            Self::SafetyActive => 2,
            Self::Journey => 3,
            Self::Arrival => 4,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::SafetyActive => "Safety Active",
            Self::Journey => "Journey",
            Self::Arrival => "Arrival",
        }
    }
}

impl fmt::Display for JourneyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    #[default]
    Safe,
    Monitoring,
    Alert,
}

impl SafetyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Monitoring => "monitoring",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Self::Safe),
            "monitoring" => Ok(Self::Monitoring),
            "alert" => Ok(Self::Alert),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    #[default]
    Auto,
    Cab,
}

impl TransportMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Auto => "auto",
            Self::Cab => "cab",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(Self::Walking),
            "auto" => Ok(Self::Auto),
            "cab" => Ok(Self::Cab),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Day,
    Night,
}

impl EnvironmentMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}

/// Journey completion percentage, clamped to `0..=100` on construction and
/// on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Self = Self(0);
    pub const COMPLETE: Self = Self(PROGRESS_MAX);

    /// Build a progress value, clamping anything outside `0..=100`.
    #[must_use]
    pub fn new(percent: i64) -> Self {
        let clamped = percent.clamp(0, i64::from(PROGRESS_MAX));
        Self(u8::try_from(clamped).unwrap_or(PROGRESS_MAX))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 >= PROGRESS_MAX
    }

    /// Add `step` percentage points, saturating at 100.
    #[must_use]
    pub fn advanced_by(self, step: u8) -> Self {
        Self::new(i64::from(self.0) + i64::from(step))
    }
}

impl From<u8> for Progress {
    fn from(value: u8) -> Self {
        Self::new(i64::from(value))
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Read-mostly display values seeded at session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDisplay {
    pub journey_start_time: String,
    pub estimated_time: String,
    pub distance: String,
    pub safety_score: u8,
    pub responder_count: u32,
    pub safe_haven_count: u32,
    pub bubble_strength: u8,
}

impl Default for JourneyDisplay {
    fn default() -> Self {
        Self {
            journey_start_time: SEED_JOURNEY_START_TIME.to_string(),
            estimated_time: SEED_ESTIMATED_TIME.to_string(),
            distance: SEED_DISTANCE.to_string(),
            safety_score: SEED_SAFETY_SCORE,
            responder_count: SEED_RESPONDER_COUNT,
            safe_haven_count: SEED_SAFE_HAVEN_COUNT,
            bubble_strength: SEED_BUBBLE_STRENGTH,
        }
    }
}

/// Canonical simulation fields for one session.
///
/// Fields are public for reading; writes go through
/// [`JourneySession`](crate::JourneySession) so observers see every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JourneyState {
    pub step: JourneyStep,
    pub safety_status: SafetyStatus,
    pub transport_mode: TransportMode,
    pub environment_mode: EnvironmentMode,
    pub progress: Progress,
    pub is_emergency: bool,
    #[serde(flatten)]
    pub display: JourneyDisplay,
}

impl JourneyState {
    /// Status consumers should render: an active emergency always reads as
    /// [`SafetyStatus::Alert`], whatever was stored.
    #[must_use]
    pub const fn effective_safety_status(&self) -> SafetyStatus {
        if self.is_emergency {
            SafetyStatus::Alert
        } else {
            self.safety_status
        }
    }

    /// Whether a journey is between `start_journey` and arrival.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self.step, JourneyStep::SafetyActive | JourneyStep::Journey)
    }
}
