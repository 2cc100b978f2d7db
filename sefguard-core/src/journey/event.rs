//! Structured change notifications emitted by the journey session.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

use crate::state::{EnvironmentMode, JourneyStep, Progress, SafetyStatus, TransportMode};

/// Change kinds produced by a single action or timer; inline up to two.
pub type EventSet = SmallVec<[JourneyEventKind; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JourneyEventKind {
    /// A fresh journey began; progress was reset to zero.
    JourneyStarted,
    StepChanged { from: JourneyStep, to: JourneyStep },
    /// Clock-driven increment.
    ProgressAdvanced { from: Progress, to: Progress },
    /// Direct write through `set_progress`.
    ProgressSet { from: Progress, to: Progress },
    SafetyStatusChanged { from: SafetyStatus, to: SafetyStatus },
    TransportModeChanged { from: TransportMode, to: TransportMode },
    EnvironmentToggled { to: EnvironmentMode },
    EmergencyTriggered,
    EmergencyReset,
}

impl JourneyEventKind {
    /// Whether this change should interrupt the user rather than update quietly.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        matches!(
            self,
            Self::EmergencyTriggered
                | Self::SafetyStatusChanged {
                    to: SafetyStatus::Alert,
                    ..
                }
        )
    }
}

/// One stamped notification delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyEvent {
    /// Monotonic per-session sequence number, starting at 0.
    pub seq: u64,
    /// Logical clock time when the change happened.
    pub at: Duration,
    pub kind: JourneyEventKind,
}

impl JourneyEvent {
    #[must_use]
    pub const fn new(seq: u64, at: Duration, kind: JourneyEventKind) -> Self {
        Self { seq, at, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_kinds() {
        assert!(JourneyEventKind::EmergencyTriggered.is_urgent());
        assert!(
            JourneyEventKind::SafetyStatusChanged {
                from: SafetyStatus::Safe,
                to: SafetyStatus::Alert
            }
            .is_urgent()
        );
        assert!(!JourneyEventKind::EmergencyReset.is_urgent());
        assert!(
            !JourneyEventKind::ProgressAdvanced {
                from: Progress::ZERO,
                to: Progress::from(5)
            }
            .is_urgent()
        );
    }

    #[test]
    fn event_serializes_with_tagged_kind() {
        let event = JourneyEvent::new(
            3,
            Duration::from_secs(6),
            JourneyEventKind::StepChanged {
                from: JourneyStep::SafetyActive,
                to: JourneyStep::Journey,
            },
        );
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["seq"], 3);
        assert_eq!(value["kind"]["type"], "step_changed");
        assert_eq!(value["kind"]["from"], "safety-active");
        assert_eq!(value["kind"]["to"], "journey");
    }
}
