//! SEF Guard Core
//!
//! Platform-agnostic logic for the SEF Guard personal safety companion demo:
//! the journey state machine, its logical clock, the progress-to-position
//! curve, and the stub safety data with its score formula. No UI, network,
//! or timer dependencies live here.

pub mod constants;
pub mod data;
pub mod display;
pub mod journey;
pub mod position;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use constants::DEFAULT_NEARBY_DISTANCE_M;
pub use data::{Dataset, DatasetError, Responder, SafeHaven};
pub use display::{ResponderCard, ResponderMarker, StepIndicator, TransportProfile};
pub use journey::{
    ClockConfig, ClockConfigError, EventLog, JourneyClock, JourneyEvent, JourneyEventKind,
    JourneyObserver, JourneyPhase, JourneySession, SubscriptionId, TimerKind,
};
pub use position::{BezierPath, JOURNEY_PATH, Point, position, position_for};
pub use score::{SafetyRating, SafetyScore, SafetyScoreService, ScoreError, ScoreRequest};
pub use state::{
    EnvironmentMode, JourneyDisplay, JourneyState, JourneyStep, Progress, SafetyStatus,
    TransportMode,
};

/// Trait for abstracting the backing store of the safety API.
/// Hosts serve whatever implementation they are given.
pub trait CompanionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All responders, available or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn responders(&self) -> Result<Vec<Responder>, Self::Error>;

    /// Available responders within `max_distance` meters.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn nearby_responders(&self, max_distance: u32) -> Result<Vec<Responder>, Self::Error>;

    /// All safe havens, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn safe_havens(&self) -> Result<Vec<SafeHaven>, Self::Error>;

    /// Score a validated journey request.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read.
    fn journey_safety_score(&self, request: &ScoreRequest) -> Result<SafetyScore, Self::Error>;
}

impl CompanionStore for Dataset {
    type Error = std::convert::Infallible;

    fn responders(&self) -> Result<Vec<Responder>, Self::Error> {
        Ok(self.responders.clone())
    }

    fn nearby_responders(&self, max_distance: u32) -> Result<Vec<Responder>, Self::Error> {
        Ok(self.responders_within(max_distance).cloned().collect())
    }

    fn safe_havens(&self) -> Result<Vec<SafeHaven>, Self::Error> {
        Ok(self.safe_havens.clone())
    }

    fn journey_safety_score(&self, request: &ScoreRequest) -> Result<SafetyScore, Self::Error> {
        Ok(SafetyScoreService::new(self).compute(request))
    }
}
