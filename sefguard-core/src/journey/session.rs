use std::fmt;
use std::time::Duration;

use crate::journey::machine::{self, Transition};
use crate::journey::{
    ClockConfig, EventSet, JourneyClock, JourneyEvent, JourneyEventKind, JourneyObserver,
    JourneyPhase, SubscriptionId,
};
use crate::state::{JourneyState, JourneyStep, Progress, SafetyStatus, TransportMode};

/// Owns one journey state, its logical clock, and the observers watching it.
///
/// Every mutation goes through a named action so each subscriber sees every
/// change, in order. Events are delivered once the whole action or timer has
/// been applied, so when one input produces several events they all carry
/// the same final snapshot.
pub struct JourneySession {
    state: JourneyState,
    clock: JourneyClock,
    config: ClockConfig,
    observers: Vec<(SubscriptionId, Box<dyn JourneyObserver>)>,
    next_subscription: u64,
    next_seq: u64,
}

impl fmt::Debug for JourneySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JourneySession")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for JourneySession {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

impl JourneySession {
    /// Construct a session with seed state and the given pacing.
    #[must_use]
    pub fn new(config: ClockConfig) -> Self {
        Self::from_state(JourneyState::default(), config)
    }

    /// Build a session around an existing state. No timer is armed, so an
    /// in-flight state stays frozen until the next `start_journey` restarts it.
    #[must_use]
    pub fn from_state(state: JourneyState, config: ClockConfig) -> Self {
        Self {
            state,
            clock: JourneyClock::new(),
            config,
            observers: Vec::new(),
            next_subscription: 0,
            next_seq: 0,
        }
    }

    /// Borrow the current state snapshot.
    #[must_use]
    pub const fn state(&self) -> &JourneyState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &ClockConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &JourneyClock {
        &self.clock
    }

    #[must_use]
    pub const fn phase(&self) -> JourneyPhase {
        JourneyPhase::of(&self.state)
    }

    /// Register an observer; it is notified of every later change.
    pub fn subscribe(&mut self, observer: Box<dyn JourneyObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn publish(&mut self, events: EventSet) {
        for kind in events {
            let event = JourneyEvent::new(self.next_seq, self.clock.now(), kind);
            self.next_seq += 1;
            for (_, observer) in &mut self.observers {
                observer.on_change(&self.state, &event);
            }
        }
    }

    fn publish_one(&mut self, kind: JourneyEventKind) {
        let mut events = EventSet::new();
        events.push(kind);
        self.publish(events);
    }

    pub fn set_transport_mode(&mut self, mode: TransportMode) {
        let from = self.state.transport_mode;
        self.state.transport_mode = mode;
        if from != mode {
            self.publish_one(JourneyEventKind::TransportModeChanged { from, to: mode });
        }
    }

    pub fn set_safety_status(&mut self, status: SafetyStatus) {
        let from = self.state.safety_status;
        self.state.safety_status = status;
        if from != status {
            self.publish_one(JourneyEventKind::SafetyStatusChanged { from, to: status });
        }
    }

    /// Write progress directly. Range is enforced by [`Progress`] itself; no
    /// other checks apply, so this can move progress backwards.
    pub fn set_progress(&mut self, progress: Progress) {
        let from = self.state.progress;
        self.state.progress = progress;
        if from != progress {
            self.publish_one(JourneyEventKind::ProgressSet { from, to: progress });
        }
    }

    /// Override the step without touching the clock. A pending timer whose
    /// phase no longer matches is dropped when it fires.
    pub fn set_current_step(&mut self, step: JourneyStep) {
        let from = self.state.step;
        self.state.step = step;
        if from != step {
            self.publish_one(JourneyEventKind::StepChanged { from, to: step });
        }
    }

    pub fn toggle_environment_mode(&mut self) {
        let to = self.state.environment_mode.toggled();
        self.state.environment_mode = to;
        self.publish_one(JourneyEventKind::EnvironmentToggled { to });
    }

    /// Raise the emergency flag and force the stored status to alert.
    pub fn trigger_emergency(&mut self) {
        let mut events = EventSet::new();
        if !self.state.is_emergency {
            log::warn!("emergency triggered at {}", self.state.progress);
            self.state.is_emergency = true;
            events.push(JourneyEventKind::EmergencyTriggered);
        }
        let from = self.state.safety_status;
        self.state.safety_status = SafetyStatus::Alert;
        if from != SafetyStatus::Alert {
            events.push(JourneyEventKind::SafetyStatusChanged {
                from,
                to: SafetyStatus::Alert,
            });
        }
        self.publish(events);
    }

    /// Clear the emergency flag and return the stored status to safe. Step,
    /// progress, and the clock are untouched.
    pub fn reset_emergency(&mut self) {
        let mut events = EventSet::new();
        if self.state.is_emergency {
            log::info!("emergency cleared at {}", self.state.progress);
            self.state.is_emergency = false;
            events.push(JourneyEventKind::EmergencyReset);
        }
        let from = self.state.safety_status;
        self.state.safety_status = SafetyStatus::Safe;
        if from != SafetyStatus::Safe {
            events.push(JourneyEventKind::SafetyStatusChanged {
                from,
                to: SafetyStatus::Safe,
            });
        }
        self.publish(events);
    }

    /// Start a journey. From `Idle` or `Arrived` this cancels any pending
    /// timer, resets progress, and enters safety activation. While a journey
    /// is in flight with a timer pending it does nothing and returns false.
    /// An in-flight journey with no pending timer (after a manual step
    /// override or `from_state`) is restarted.
    pub fn start_journey(&mut self) -> bool {
        let transition = if !self.state.is_in_flight() {
            self.clock.cancel();
            machine::start(&mut self.state, &self.config)
        } else if self.clock.pending().is_none() {
            log::warn!(
                "restarting stalled journey in step {} at {}",
                self.state.step,
                self.state.progress
            );
            machine::restart(&mut self.state, &self.config)
        } else {
            log::warn!(
                "start_journey ignored: journey already in step {}",
                self.state.step
            );
            return false;
        };
        log::info!("journey started ({} mode)", self.state.transport_mode);
        self.commit(transition);
        true
    }

    fn commit(&mut self, transition: Transition) {
        if let Some((kind, delay)) = transition.next {
            self.clock.schedule(kind, delay);
        }
        for event in &transition.events {
            match event {
                JourneyEventKind::StepChanged { from, to } => {
                    log::info!("journey step {from} -> {to}");
                }
                JourneyEventKind::ProgressAdvanced { to, .. } => {
                    log::debug!("journey progress {to}");
                }
                _ => {}
            }
        }
        self.publish(transition.events);
    }

    /// Advance logical time by `elapsed`, firing every timer that falls due
    /// in order. Returns how many timers fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let deadline = self.clock.now().saturating_add(elapsed);
        let mut fired = 0;
        while let Some(timer) = self.clock.fire_due(deadline) {
            fired += 1;
            let transition = machine::apply(&mut self.state, timer.kind, &self.config);
            self.commit(transition);
        }
        self.clock.settle(deadline);
        fired
    }

    /// Fast-forward until no timer is pending. Returns how many timers fired.
    pub fn run_to_completion(&mut self) -> usize {
        let mut fired = 0;
        while let Some(wait) = self.clock.until_next() {
            fired += self.advance(wait);
        }
        fired
    }

    /// Consume the session, returning the final state.
    #[must_use]
    pub fn into_state(self) -> JourneyState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::EventLog;

    fn session_with_log() -> (JourneySession, EventLog) {
        let mut session = JourneySession::default();
        let log = EventLog::default();
        session.subscribe(Box::new(log.clone()));
        (session, log)
    }

    #[test]
    fn start_then_activation_delay_then_ticks() {
        let (mut session, _log) = session_with_log();
        assert!(session.start_journey());
        assert_eq!(session.state().step, JourneyStep::SafetyActive);

        assert_eq!(session.advance(Duration::from_millis(2_999)), 0);
        assert_eq!(session.state().step, JourneyStep::SafetyActive);

        assert_eq!(session.advance(Duration::from_millis(1)), 1);
        assert_eq!(session.state().step, JourneyStep::Journey);
        assert_eq!(session.state().progress, Progress::ZERO);

        session.advance(Duration::from_secs(3));
        assert_eq!(session.state().progress, Progress::from(5));
        session.advance(Duration::from_secs(6));
        assert_eq!(session.state().progress, Progress::from(15));
    }

    #[test]
    fn second_start_while_in_flight_does_not_double_tick() {
        let (mut session, _log) = session_with_log();
        session.start_journey();
        session.advance(Duration::from_secs(6));
        assert!(!session.start_journey());
        session.advance(Duration::from_secs(3));
        assert_eq!(session.state().progress, Progress::from(10));
    }

    #[test]
    fn emergency_toggles_are_idempotent() {
        let (mut session, log) = session_with_log();
        session.set_safety_status(SafetyStatus::Monitoring);
        session.trigger_emergency();
        session.trigger_emergency();
        assert!(session.state().is_emergency);
        assert_eq!(session.state().safety_status, SafetyStatus::Alert);
        session.reset_emergency();
        session.reset_emergency();
        assert!(!session.state().is_emergency);
        assert_eq!(session.state().safety_status, SafetyStatus::Safe);
        // monitoring, triggered, alert, reset, safe
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn emergency_does_not_touch_clock() {
        let (mut session, _log) = session_with_log();
        session.start_journey();
        session.advance(Duration::from_secs(9));
        let pending = session.clock().pending();
        session.trigger_emergency();
        assert_eq!(session.clock().pending(), pending);
        session.reset_emergency();
        assert_eq!(session.state().progress, Progress::from(10));
        assert_eq!(session.state().step, JourneyStep::Journey);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut session = JourneySession::default();
        let log = EventLog::default();
        let id = session.subscribe(Box::new(log.clone()));
        session.toggle_environment_mode();
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.toggle_environment_mode();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn setters_only_publish_real_changes() {
        let (mut session, log) = session_with_log();
        session.set_transport_mode(TransportMode::Auto);
        session.set_transport_mode(TransportMode::Walking);
        session.set_progress(Progress::from(40));
        session.set_progress(Progress::from(40));
        session.set_current_step(JourneyStep::Start);
        assert_eq!(log.len(), 2);
        assert_eq!(session.state().progress, Progress::from(40));
    }

    #[test]
    fn advance_saturates_logical_time() {
        let (mut session, _log) = session_with_log();
        session.start_journey();
        session.advance(Duration::from_secs(1));
        assert_eq!(session.advance(Duration::MAX), 21);
        assert_eq!(session.state().step, JourneyStep::Arrival);
        assert_eq!(session.clock().now(), Duration::MAX);
        session.advance(Duration::from_secs(1));
        assert_eq!(session.clock().now(), Duration::MAX);
    }

    #[test]
    fn stalled_journey_can_be_restarted() {
        let (mut session, _log) = session_with_log();
        session.set_current_step(JourneyStep::Journey);
        session.set_progress(Progress::from(20));
        assert!(session.clock().pending().is_none());

        assert!(session.start_journey());
        assert_eq!(session.state().step, JourneyStep::SafetyActive);
        assert_eq!(session.state().progress, Progress::ZERO);
        assert!(!session.start_journey());
        session.run_to_completion();
        assert_eq!(session.state().step, JourneyStep::Arrival);
    }

    #[test]
    fn multi_event_inputs_share_the_final_snapshot() {
        let cfg = ClockConfig {
            progress_step: 50,
            ..ClockConfig::default()
        };
        let mut session = JourneySession::new(cfg);
        let log = EventLog::default();
        session.subscribe(Box::new(log.clone()));
        session.start_journey();
        session.run_to_completion();

        let entries = log.entries();
        let (last_tick, snapshot) = entries
            .iter()
            .rev()
            .find(|(event, _)| matches!(event.kind, JourneyEventKind::ProgressAdvanced { .. }))
            .unwrap();
        assert_eq!(
            last_tick.kind,
            JourneyEventKind::ProgressAdvanced {
                from: Progress::from(50),
                to: Progress::COMPLETE
            }
        );
        assert_eq!(snapshot.step, JourneyStep::Arrival);

        session.trigger_emergency();
        let entries = log.entries();
        let (event, snapshot) = &entries[entries.len() - 2];
        assert_eq!(event.kind, JourneyEventKind::EmergencyTriggered);
        assert_eq!(snapshot.safety_status, SafetyStatus::Alert);
    }

    #[test]
    fn manual_step_override_drops_stale_timer() {
        let (mut session, _log) = session_with_log();
        session.start_journey();
        session.set_current_step(JourneyStep::Start);
        session.advance(Duration::from_secs(10));
        assert_eq!(session.state().step, JourneyStep::Start);
        assert!(session.clock().pending().is_none());
    }
}
