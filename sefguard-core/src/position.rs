//! Journey progress to normalized screen position.
//!
//! Every consumer that needs "where is the user right now" goes through
//! [`position`] so markers, trails, and overlays agree on the same curve.

use serde::{Deserialize, Serialize};

use crate::state::Progress;

/// Point in normalized `[0, 1] x [0, 1]` screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale to percentage coordinates (`0..=100`).
    #[must_use]
    pub fn as_percent(self) -> Self {
        Self::new(self.x * 100.0, self.y * 100.0)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Cubic Bezier curve defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

/// The fixed curve the simulated journey follows.
pub const JOURNEY_PATH: BezierPath = BezierPath {
    start: Point::new(0.25, 0.25),
    control1: Point::new(0.35, 0.40),
    control2: Point::new(0.65, 0.50),
    end: Point::new(0.75, 0.75),
};

impl BezierPath {
    /// Evaluate the curve at `t` in `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.end.x,
            b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.end.y,
        )
    }

    /// Position for a completion percentage. Boundaries return the literal
    /// anchors so endpoint rendering is bit-stable.
    #[must_use]
    pub fn at_percent(&self, progress_percent: f64) -> Point {
        if progress_percent.is_nan() || progress_percent <= 0.0 {
            return self.start;
        }
        if progress_percent >= 100.0 {
            return self.end;
        }
        self.evaluate(progress_percent / 100.0)
    }
}

/// Where the user is drawn for a given completion percentage.
#[must_use]
pub fn position(progress_percent: f64) -> Point {
    JOURNEY_PATH.at_percent(progress_percent)
}

#[must_use]
pub fn position_for(progress: Progress) -> Point {
    position(f64::from(progress.get()))
}
