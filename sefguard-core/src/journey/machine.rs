//! Journey transition function.
//!
//! Everything here is synchronous and timer-free: callers hand in a state and
//! a fired timer, and get back the change events plus the timer to arm next.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::journey::{ClockConfig, EventSet, JourneyEventKind, TimerKind};
use crate::state::{JourneyState, JourneyStep, Progress};

/// Clock-facing view of the journey step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyPhase {
    Idle,
    Activating,
    Advancing,
    Arrived,
}

impl JourneyPhase {
    #[must_use]
    pub const fn of(state: &JourneyState) -> Self {
        match state.step {
            JourneyStep::Start => Self::Idle,
            JourneyStep::SafetyActive => Self::Activating,
            JourneyStep::Journey => Self::Advancing,
            JourneyStep::Arrival => Self::Arrived,
        }
    }
}

/// Result of applying one input to the journey.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub events: EventSet,
    /// Timer to arm after the transition, relative to the firing time.
    pub next: Option<(TimerKind, Duration)>,
}

impl Transition {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.events.is_empty() && self.next.is_none()
    }
}

fn write_step(state: &mut JourneyState, to: JourneyStep, events: &mut EventSet) {
    let from = state.step;
    if from != to {
        state.step = to;
        events.push(JourneyEventKind::StepChanged { from, to });
    }
}

/// Begin a fresh journey from `Idle` or `Arrived`.
///
/// A journey already in flight is left untouched and no timer is requested.
pub fn start(state: &mut JourneyState, cfg: &ClockConfig) -> Transition {
    if state.is_in_flight() {
        return Transition::none();
    }
    restart(state, cfg)
}

/// Begin a fresh journey from any step. Used when an in-flight journey has
/// no timer left to move it forward.
pub fn restart(state: &mut JourneyState, cfg: &ClockConfig) -> Transition {
    let mut events = EventSet::new();
    events.push(JourneyEventKind::JourneyStarted);
    state.progress = Progress::ZERO;
    write_step(state, JourneyStep::SafetyActive, &mut events);
    Transition {
        events,
        next: Some((TimerKind::Activation, cfg.activation_delay())),
    }
}

/// Apply a fired timer.
///
/// Timers that no longer match the current phase (for example after a manual
/// step override) are dropped without rescheduling.
pub fn apply(state: &mut JourneyState, timer: TimerKind, cfg: &ClockConfig) -> Transition {
    match (JourneyPhase::of(state), timer) {
        (JourneyPhase::Activating, TimerKind::Activation) => {
            let mut events = EventSet::new();
            write_step(state, JourneyStep::Journey, &mut events);
            Transition {
                events,
                next: Some((TimerKind::Tick, cfg.tick_interval())),
            }
        }
        (JourneyPhase::Advancing, TimerKind::Tick) => tick(state, cfg),
        _ => Transition::none(),
    }
}

fn tick(state: &mut JourneyState, cfg: &ClockConfig) -> Transition {
    let mut events = EventSet::new();
    let from = state.progress;
    let to = from.advanced_by(cfg.progress_step);
    state.progress = to;
    if from != to {
        events.push(JourneyEventKind::ProgressAdvanced { from, to });
    }
    if to.is_complete() {
        write_step(state, JourneyStep::Arrival, &mut events);
        return Transition { events, next: None };
    }
    Transition {
        events,
        next: Some((TimerKind::Tick, cfg.tick_interval())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_moves_idle_to_activating_and_arms_activation() {
        let cfg = ClockConfig::default();
        let mut state = JourneyState {
            progress: Progress::from(40),
            ..JourneyState::default()
        };
        let transition = start(&mut state, &cfg);
        assert_eq!(state.step, JourneyStep::SafetyActive);
        assert_eq!(state.progress, Progress::ZERO);
        assert_eq!(
            transition.next,
            Some((TimerKind::Activation, Duration::from_secs(3)))
        );
        assert_eq!(transition.events[0], JourneyEventKind::JourneyStarted);
        assert_eq!(
            transition.events[1],
            JourneyEventKind::StepChanged {
                from: JourneyStep::Start,
                to: JourneyStep::SafetyActive
            }
        );
    }

    #[test]
    fn start_is_ignored_while_in_flight() {
        let cfg = ClockConfig::default();
        let mut state = JourneyState {
            step: JourneyStep::Journey,
            progress: Progress::from(35),
            ..JourneyState::default()
        };
        assert!(start(&mut state, &cfg).is_noop());
        assert_eq!(state.progress, Progress::from(35));
    }

    #[test]
    fn restart_resets_an_in_flight_state() {
        let cfg = ClockConfig::default();
        let mut state = JourneyState {
            step: JourneyStep::Journey,
            progress: Progress::from(35),
            ..JourneyState::default()
        };
        let transition = restart(&mut state, &cfg);
        assert_eq!(state.step, JourneyStep::SafetyActive);
        assert_eq!(state.progress, Progress::ZERO);
        assert_eq!(
            transition.next,
            Some((TimerKind::Activation, Duration::from_secs(3)))
        );
    }

    #[test]
    fn activation_begins_ticking() {
        let cfg = ClockConfig::default();
        let mut state = JourneyState {
            step: JourneyStep::SafetyActive,
            ..JourneyState::default()
        };
        let transition = apply(&mut state, TimerKind::Activation, &cfg);
        assert_eq!(state.step, JourneyStep::Journey);
        assert_eq!(
            transition.next,
            Some((TimerKind::Tick, Duration::from_secs(3)))
        );
    }

    #[test]
    fn final_tick_clamps_and_arrives() {
        let cfg = ClockConfig {
            progress_step: 30,
            ..ClockConfig::default()
        };
        let mut state = JourneyState {
            step: JourneyStep::Journey,
            progress: Progress::from(90),
            ..JourneyState::default()
        };
        let transition = apply(&mut state, TimerKind::Tick, &cfg);
        assert_eq!(state.progress, Progress::COMPLETE);
        assert_eq!(state.step, JourneyStep::Arrival);
        assert!(transition.next.is_none());
        assert_eq!(transition.events.len(), 2);
        assert_eq!(JourneyPhase::of(&state), JourneyPhase::Arrived);
    }

    #[test]
    fn stale_timers_are_dropped() {
        let cfg = ClockConfig::default();
        let mut state = JourneyState::default();
        assert!(apply(&mut state, TimerKind::Tick, &cfg).is_noop());
        assert!(apply(&mut state, TimerKind::Activation, &cfg).is_noop());
        state.step = JourneyStep::Arrival;
        assert!(apply(&mut state, TimerKind::Tick, &cfg).is_noop());
        assert_eq!(state, JourneyState {
            step: JourneyStep::Arrival,
            ..JourneyState::default()
        });
    }
}
