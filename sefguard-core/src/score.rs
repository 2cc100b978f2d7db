//! Deterministic journey safety scoring over the in-memory dataset.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    DEFAULT_NEARBY_DISTANCE_M, RATING_CAUTION_MIN, RATING_EXCELLENT_MIN, RATING_GOOD_MIN,
    RATING_MODERATE_MIN, SCORE_BASE, SCORE_CAB_BONUS, SCORE_MAX, SCORE_PER_RESPONDER,
    SCORE_RESPONDER_CAP, SCORE_SAFE_HAVEN_CAP, SCORE_WALKING_PENALTY,
};
use crate::data::Dataset;
use crate::state::TransportMode;

/// Client-side problems with a score request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Missing required parameters")]
    MissingParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyRating {
    Excellent,
    Good,
    Moderate,
    Caution,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl SafetyRating {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        if score >= RATING_EXCELLENT_MIN {
            Self::Excellent
        } else if score >= RATING_GOOD_MIN {
            Self::Good
        } else if score >= RATING_MODERATE_MIN {
            Self::Moderate
        } else if score >= RATING_CAUTION_MIN {
            Self::Caution
        } else {
            Self::HighRisk
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Caution => "Caution",
            Self::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for SafetyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated score request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRequest {
    pub from: String,
    pub to: String,
    /// `None` when the mode was present but not recognized; such requests
    /// are scored with no mode adjustment.
    pub mode: Option<TransportMode>,
}

impl ScoreRequest {
    /// Build a request from raw query parameters. Absent and empty values are
    /// both treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::MissingParameters`] when any parameter is missing.
    pub fn from_query(
        from: Option<&str>,
        to: Option<&str>,
        mode: Option<&str>,
    ) -> Result<Self, ScoreError> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.is_empty())
        }

        let (Some(from), Some(to), Some(mode)) = (present(from), present(to), present(mode))
        else {
            return Err(ScoreError::MissingParameters);
        };
        let parsed = mode.parse::<TransportMode>().ok();
        if parsed.is_none() {
            log::debug!("unrecognized transport mode '{mode}', scoring without adjustment");
        }
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            mode: parsed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyScore {
    pub score: u8,
    pub rating: SafetyRating,
    pub safe_havens_count: u32,
    pub responder_count: u32,
}

/// Apply the score formula to pre-counted inputs. An unrecognized mode
/// (`None`) gets no adjustment.
#[must_use]
pub fn score_for(
    mode: Option<TransportMode>,
    nearby_responders: usize,
    active_havens: usize,
) -> u8 {
    let responders = i32::try_from(nearby_responders).unwrap_or(i32::MAX);
    let havens = i32::try_from(active_havens).unwrap_or(i32::MAX);
    let mut score = SCORE_BASE;
    match mode {
        Some(TransportMode::Walking) => score -= SCORE_WALKING_PENALTY,
        Some(TransportMode::Cab) => score += SCORE_CAB_BONUS,
        Some(TransportMode::Auto) | None => {}
    }
    score += responders.saturating_mul(SCORE_PER_RESPONDER).min(SCORE_RESPONDER_CAP);
    score += havens.min(SCORE_SAFE_HAVEN_CAP);
    u8::try_from(score.clamp(0, SCORE_MAX)).unwrap_or(0)
}

/// Scores journeys against a borrowed dataset.
#[derive(Debug, Clone, Copy)]
pub struct SafetyScoreService<'a> {
    dataset: &'a Dataset,
    max_distance: u32,
}

impl<'a> SafetyScoreService<'a> {
    #[must_use]
    pub const fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            max_distance: DEFAULT_NEARBY_DISTANCE_M,
        }
    }

    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Score a journey. Origin and destination are accepted but do not
    /// influence the result.
    #[must_use]
    pub fn compute(&self, request: &ScoreRequest) -> SafetyScore {
        let nearby = self.dataset.responders_within(self.max_distance).count();
        let havens = self.dataset.active_safe_havens().count();
        let score = score_for(request.mode, nearby, havens);
        log::debug!(
            "safety score {} -> {} via {}: {score} ({nearby} responders, {havens} havens)",
            request.from,
            request.to,
            request.mode.map_or("unrecognized mode", TransportMode::as_str)
        );
        SafetyScore {
            score,
            rating: SafetyRating::from_score(score),
            safe_havens_count: u32::try_from(havens).unwrap_or(u32::MAX),
            responder_count: u32::try_from(nearby).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: TransportMode) -> ScoreRequest {
        ScoreRequest {
            from: "A".to_string(),
            to: "B".to_string(),
            mode: Some(mode),
        }
    }

    #[test]
    fn walking_with_one_responder_and_five_havens_is_good() {
        assert_eq!(score_for(Some(TransportMode::Walking), 1, 5), 84);
        assert_eq!(SafetyRating::from_score(84), SafetyRating::Good);
    }

    #[test]
    fn cab_with_nothing_nearby_is_excellent() {
        let score = score_for(Some(TransportMode::Cab), 0, 0);
        assert_eq!(score, 92);
        assert_eq!(SafetyRating::from_score(score), SafetyRating::Excellent);
    }

    #[test]
    fn caps_apply_before_clamp() {
        assert_eq!(score_for(Some(TransportMode::Auto), 50, 50), 100);
        assert_eq!(score_for(Some(TransportMode::Walking), 0, 0), 77);
        assert_eq!(score_for(Some(TransportMode::Auto), 3, 2), 95);
    }

    #[test]
    fn rating_ladder_breakpoints() {
        assert_eq!(SafetyRating::from_score(90), SafetyRating::Excellent);
        assert_eq!(SafetyRating::from_score(89), SafetyRating::Good);
        assert_eq!(SafetyRating::from_score(70), SafetyRating::Moderate);
        assert_eq!(SafetyRating::from_score(60), SafetyRating::Caution);
        assert_eq!(SafetyRating::from_score(59), SafetyRating::HighRisk);
        assert_eq!(
            serde_json::to_string(&SafetyRating::HighRisk).unwrap(),
            "\"High Risk\""
        );
    }

    #[test]
    fn seed_dataset_scores() {
        let data = Dataset::seed();
        let service = SafetyScoreService::new(&data);
        // 87 + 6 (three responders) + 5 (five havens) = 98
        let auto = service.compute(&request(TransportMode::Auto));
        assert_eq!(auto.score, 98);
        assert_eq!(auto.rating, SafetyRating::Excellent);
        assert_eq!(auto.responder_count, 3);
        assert_eq!(auto.safe_havens_count, 5);

        let walking = service.compute(&request(TransportMode::Walking));
        assert_eq!(walking.score, 88);
        assert_eq!(walking.rating, SafetyRating::Good);

        let narrow = service.with_max_distance(150).compute(&request(TransportMode::Cab));
        assert_eq!(narrow.responder_count, 1);
        assert_eq!(narrow.score, 99);
    }

    #[test]
    fn query_validation() {
        assert_eq!(
            ScoreRequest::from_query(None, Some("B"), Some("cab")),
            Err(ScoreError::MissingParameters)
        );
        assert_eq!(
            ScoreRequest::from_query(Some("A"), Some(""), Some("cab")),
            Err(ScoreError::MissingParameters)
        );
        assert_eq!(
            ScoreRequest::from_query(Some("A"), Some("B"), None),
            Err(ScoreError::MissingParameters)
        );
        let ok = ScoreRequest::from_query(Some("A"), Some("B"), Some("walking")).unwrap();
        assert_eq!(ok.mode, Some(TransportMode::Walking));
    }

    #[test]
    fn unrecognized_mode_scores_like_auto() {
        let bike = ScoreRequest::from_query(Some("A"), Some("B"), Some("bike")).unwrap();
        assert_eq!(bike.mode, None);
        assert_eq!(bike.from, "A");

        let data = Dataset::seed();
        let service = SafetyScoreService::new(&data);
        let score = service.compute(&bike);
        assert_eq!(score.score, 98);
        assert_eq!(score, service.compute(&request(TransportMode::Auto)));
    }

    #[test]
    fn score_json_shape() {
        let value = serde_json::to_value(SafetyScore {
            score: 84,
            rating: SafetyRating::Good,
            safe_havens_count: 5,
            responder_count: 1,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 84,
                "rating": "Good",
                "safeHavensCount": 5,
                "responderCount": 1
            })
        );
    }
}
