//! Non-rendering display logic derived from the journey state: the step
//! header, transport card, responder card visibility, and responder markers
//! drifting toward the traveller during an alert.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONNECTOR_FILL_CURRENT, PURSUIT_SPEED_ALERT, PURSUIT_SPEED_EMERGENCY,
    RESPONDER_CARD_HIDE_FROM, RESPONDER_CARD_SHOW_FROM, RESPONDER_CARD_SHOW_UNTIL,
};
use crate::position::{JOURNEY_PATH, Point};
use crate::state::{JourneyState, JourneyStep, Progress, SafetyStatus, TransportMode};

/// Header summary of where the journey stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub current: JourneyStep,
    /// One-based position of the current step.
    pub position: u8,
    pub total: u8,
    pub label: &'static str,
}

impl StepIndicator {
    #[must_use]
    pub const fn for_step(step: JourneyStep) -> Self {
        Self {
            current: step,
            position: step.ordinal(),
            total: JourneyStep::ALL.len() as u8,
            label: step.label(),
        }
    }

    /// Fill fraction of the connector after `segment`: full behind the
    /// current step, partial at it, empty ahead.
    #[must_use]
    pub fn connector_fill(&self, segment: JourneyStep) -> f32 {
        let ordinal = segment.ordinal();
        if ordinal < self.position {
            1.0
        } else if ordinal == self.position {
            CONNECTOR_FILL_CURRENT
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_reached(&self, step: JourneyStep) -> bool {
        step.ordinal() <= self.position
    }
}

/// Transport card contents for the chosen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransportProfile {
    pub mode: TransportMode,
    pub name: &'static str,
    pub driver: Option<&'static str>,
    /// Pickup ETA; walking has none.
    pub pickup_eta: Option<&'static str>,
}

impl TransportProfile {
    #[must_use]
    pub const fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Walking => Self {
                mode,
                name: "Walking",
                driver: None,
                pickup_eta: None,
            },
            TransportMode::Auto => Self {
                mode,
                name: "Auto Rickshaw",
                driver: Some("Vijay K."),
                pickup_eta: Some("4 min"),
            },
            TransportMode::Cab => Self {
                mode,
                name: "Cab Service",
                driver: Some("Akash M."),
                pickup_eta: Some("6 min"),
            },
        }
    }
}

/// Sticky visibility of the nearby-responder card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponderCard {
    pub visible: bool,
}

impl ResponderCard {
    /// Shown in the 30-40% window, hidden from 60%, otherwise unchanged.
    pub fn update(&mut self, progress: Progress) -> bool {
        let p = progress.get();
        if (RESPONDER_CARD_SHOW_FROM..RESPONDER_CARD_SHOW_UNTIL).contains(&p) {
            self.visible = true;
        } else if p >= RESPONDER_CARD_HIDE_FROM {
            self.visible = false;
        }
        self.visible
    }
}

/// Responder pin on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponderMarker {
    pub id: u32,
    pub at: Point,
}

impl ResponderMarker {
    /// Demo placement of the three seed responders.
    #[must_use]
    pub fn seed_markers() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                at: Point::new(0.55, 0.45),
            },
            Self {
                id: 2,
                at: Point::new(0.40, 0.50),
            },
            Self {
                id: 3,
                at: Point::new(0.60, 0.60),
            },
        ]
    }

    /// Step toward the traveller when the effective status is alert. Returns
    /// whether the marker moved.
    pub fn pursue(&mut self, state: &JourneyState) -> bool {
        if state.effective_safety_status() != SafetyStatus::Alert {
            return false;
        }
        let speed = if state.is_emergency {
            PURSUIT_SPEED_EMERGENCY
        } else {
            PURSUIT_SPEED_ALERT
        };
        let target = straight_line_position(state.progress);
        let length = self.at.distance_to(target);
        if length == 0.0 {
            return false;
        }
        self.at = Point::new(
            self.at.x + (target.x - self.at.x) / length * speed,
            self.at.y + (target.y - self.at.y) / length * speed,
        );
        true
    }
}

/// Linear interpolation between the journey anchors; markers chase this
/// rather than the curved path.
#[must_use]
pub fn straight_line_position(progress: Progress) -> Point {
    let t = f64::from(progress.get()) / 100.0;
    let start = JOURNEY_PATH.start;
    let end = JOURNEY_PATH.end;
    Point::new(
        start.x + (end.x - start.x) * t,
        start.y + (end.y - start.y) * t,
    )
}
