//! Real-time adapter for the journey clock plus a console observer that
//! renders the journey as a colored timeline.

use anyhow::{Result, bail};
use colored::Colorize;
use sefguard_core::{
    JourneyEvent, JourneyEventKind, JourneyObserver, JourneyPhase, JourneySession, JourneyState,
    Progress, ResponderCard, ResponderMarker, SafetyStatus, StepIndicator, position_for,
};
use std::io::Write;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// How the host feeds wall-clock time into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverOptions {
    /// Host timer period.
    pub poll: Duration,
    /// Logical seconds per wall-clock second.
    pub speed: f64,
    /// Raise an emergency once progress reaches this value.
    pub emergency_at: Option<Progress>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            poll: Duration::from_millis(100),
            speed: 1.0,
            emergency_at: None,
        }
    }
}

impl DriverOptions {
    /// # Errors
    ///
    /// Returns an error if the poll period is zero or the speed is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.poll.is_zero() {
            bail!("poll period must be greater than zero");
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            bail!("speed must be a positive number (got {})", self.speed);
        }
        Ok(())
    }
}

/// Wall-clock time scaled into logical time, saturating when the product is
/// too large for a `Duration`.
fn scaled(elapsed: Duration, speed: f64) -> Duration {
    Duration::try_from_secs_f64(elapsed.as_secs_f64() * speed).unwrap_or(Duration::MAX)
}

/// Start a journey and drive it from a tokio interval until arrival.
///
/// # Errors
///
/// Returns an error if the options are invalid.
pub async fn drive(session: &mut JourneySession, options: DriverOptions) -> Result<JourneyState> {
    options.validate()?;
    session.start_journey();

    let mut interval = tokio::time::interval(options.poll);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut emergency_raised = false;

    while session.phase() != JourneyPhase::Arrived {
        interval.tick().await;
        let now = Instant::now();
        let elapsed = scaled(now.duration_since(last), options.speed);
        last = now;
        session.advance(elapsed);

        if let Some(threshold) = options.emergency_at
            && !emergency_raised
            && session.state().progress >= threshold
        {
            session.trigger_emergency();
            emergency_raised = true;
        }
    }
    Ok(session.state().clone())
}

/// Prints one line per journey change.
pub struct ConsoleObserver<W: Write + Send> {
    out: W,
    card: ResponderCard,
    markers: Vec<ResponderMarker>,
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            card: ResponderCard::default(),
            markers: ResponderMarker::seed_markers(),
        }
    }

    fn line(&mut self, text: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        // Console output is best-effort.
        let _ = writeln!(self.out, "{} {text}", stamp.to_string().dimmed());
    }

    fn describe(state: &JourneyState, kind: &JourneyEventKind) -> String {
        match *kind {
            JourneyEventKind::JourneyStarted => format!(
                "{} ({})",
                "Journey started".bright_cyan().bold(),
                state.transport_mode
            ),
            JourneyEventKind::StepChanged { to, .. } => {
                let indicator = StepIndicator::for_step(to);
                format!(
                    "{} {}/{} {}",
                    "Step".cyan(),
                    indicator.position,
                    indicator.total,
                    indicator.label.bold()
                )
            }
            JourneyEventKind::ProgressAdvanced { to, .. }
            | JourneyEventKind::ProgressSet { to, .. } => {
                let at = position_for(to).as_percent();
                format!(
                    "{} {:>4} at ({:.1}%, {:.1}%)",
                    "Progress".green(),
                    to.to_string(),
                    at.x,
                    at.y
                )
            }
            JourneyEventKind::SafetyStatusChanged { to, .. } => {
                let status = match state.effective_safety_status() {
                    SafetyStatus::Alert => to.to_string().red().bold(),
                    SafetyStatus::Monitoring => to.to_string().yellow(),
                    SafetyStatus::Safe => to.to_string().green(),
                };
                format!("{} {status}", "Safety status".cyan())
            }
            JourneyEventKind::TransportModeChanged { to, .. } => {
                format!("{} {to}", "Transport".cyan())
            }
            JourneyEventKind::EnvironmentToggled { to } => {
                format!("{} {to:?}", "Environment".cyan())
            }
            JourneyEventKind::EmergencyTriggered => {
                "EMERGENCY triggered, responders converging"
                    .red()
                    .bold()
                    .to_string()
            }
            JourneyEventKind::EmergencyReset => "Emergency cleared".green().to_string(),
        }
    }
}

impl<W: Write + Send> JourneyObserver for ConsoleObserver<W> {
    fn on_change(&mut self, state: &JourneyState, event: &JourneyEvent) {
        let text = Self::describe(state, &event.kind);
        self.line(&text);

        let was_visible = self.card.visible;
        if self.card.update(state.progress) != was_visible {
            let text = if self.card.visible {
                "Nearby responder card shown".bright_blue().to_string()
            } else {
                "Nearby responder card hidden".blue().to_string()
            };
            self.line(&text);
        }

        let moved = self
            .markers
            .iter_mut()
            .fold(0, |count, marker| count + usize::from(marker.pursue(state)));
        if moved > 0 {
            log::debug!("{moved} responder markers moved toward the traveller");
        }
    }
}
