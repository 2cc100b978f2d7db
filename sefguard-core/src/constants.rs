//! Centralized timing and scoring constants for the SEF Guard simulation.
//!
//! These values define the deterministic pacing of the scripted journey and
//! the safety score formula. Keeping them together means the demo can only
//! be retuned through reviewed code changes.

// Journey clock -------------------------------------------------------------
pub(crate) const ACTIVATION_DELAY_MS: u64 = 3_000;
pub(crate) const TICK_INTERVAL_MS: u64 = 3_000;
pub(crate) const PROGRESS_STEP: u8 = 5;
pub(crate) const PROGRESS_MAX: u8 = 100;

// Display seeds -------------------------------------------------------------
pub(crate) const SEED_JOURNEY_START_TIME: &str = "5:45 PM";
pub(crate) const SEED_ESTIMATED_TIME: &str = "23 min";
pub(crate) const SEED_DISTANCE: &str = "3.8 km";
pub(crate) const SEED_SAFETY_SCORE: u8 = 87;
pub(crate) const SEED_RESPONDER_COUNT: u32 = 12;
pub(crate) const SEED_SAFE_HAVEN_COUNT: u32 = 5;
pub(crate) const SEED_BUBBLE_STRENGTH: u8 = 85;

// Safety score --------------------------------------------------------------
pub(crate) const SCORE_BASE: i32 = 87;
pub(crate) const SCORE_WALKING_PENALTY: i32 = 10;
pub(crate) const SCORE_CAB_BONUS: i32 = 5;
pub(crate) const SCORE_PER_RESPONDER: i32 = 2;
pub(crate) const SCORE_RESPONDER_CAP: i32 = 10;
pub(crate) const SCORE_SAFE_HAVEN_CAP: i32 = 5;
pub(crate) const SCORE_MAX: i32 = 100;
pub(crate) const RATING_EXCELLENT_MIN: u8 = 90;
pub(crate) const RATING_GOOD_MIN: u8 = 80;
pub(crate) const RATING_MODERATE_MIN: u8 = 70;
pub(crate) const RATING_CAUTION_MIN: u8 = 60;

/// Radius, in meters, used when the caller does not supply one.
pub const DEFAULT_NEARBY_DISTANCE_M: u32 = 500;

// Display helpers -----------------------------------------------------------
pub(crate) const RESPONDER_CARD_SHOW_FROM: u8 = 30;
pub(crate) const RESPONDER_CARD_SHOW_UNTIL: u8 = 40;
pub(crate) const RESPONDER_CARD_HIDE_FROM: u8 = 60;
pub(crate) const PURSUIT_SPEED_EMERGENCY: f64 = 0.0015;
pub(crate) const PURSUIT_SPEED_ALERT: f64 = 0.0005;
pub(crate) const CONNECTOR_FILL_CURRENT: f32 = 0.7;

// Event log -----------------------------------------------------------------
pub(crate) const EVENT_LOG_DEFAULT_CAPACITY: usize = 256;
