use sefguard_core::{
    CompanionStore, Dataset, Responder, SafeHaven, SafetyRating, SafetyScoreService, ScoreError,
    ScoreRequest,
};

fn responder(id: u32, distance: u32, available: bool) -> Responder {
    Responder {
        id,
        name: format!("Responder {id}"),
        skills: vec!["First Aid".to_string()],
        location: "Test Road".to_string(),
        distance,
        is_available: available,
        profile_image: String::new(),
    }
}

fn haven(id: u32, active: bool) -> SafeHaven {
    SafeHaven {
        id,
        name: format!("Haven {id}"),
        kind: "Pharmacy".to_string(),
        location: "Test Road".to_string(),
        is_active: active,
    }
}

fn request(mode: &str) -> ScoreRequest {
    ScoreRequest::from_query(Some("A"), Some("B"), Some(mode)).unwrap()
}

#[test]
fn walking_with_one_nearby_responder_and_five_havens() {
    let data = Dataset {
        responders: vec![
            responder(1, 120, true),
            responder(2, 900, true),
            responder(3, 80, false),
        ],
        safe_havens: (1..=5).map(|id| haven(id, true)).collect(),
    };
    let score = SafetyScoreService::new(&data).compute(&request("walking"));
    assert_eq!(score.score, 84);
    assert_eq!(score.rating, SafetyRating::Good);
    assert_eq!(score.responder_count, 1);
    assert_eq!(score.safe_havens_count, 5);
}

#[test]
fn cab_with_empty_surroundings() {
    let data = Dataset {
        responders: vec![responder(1, 501, true)],
        safe_havens: vec![haven(1, false)],
    };
    let score = data.journey_safety_score(&request("cab")).unwrap();
    assert_eq!(score.score, 92);
    assert_eq!(score.rating, SafetyRating::Excellent);
    assert_eq!(score.responder_count, 0);
    assert_eq!(score.safe_havens_count, 0);
}

#[test]
fn missing_parameters_are_client_errors() {
    for (from, to, mode) in [
        (None, Some("B"), Some("cab")),
        (Some("A"), None, Some("cab")),
        (Some("A"), Some("B"), None),
    ] {
        assert_eq!(
            ScoreRequest::from_query(from, to, mode),
            Err(ScoreError::MissingParameters)
        );
    }
}

#[test]
fn nearby_query_on_seed_data() {
    let data = Dataset::seed();
    assert!(data.nearby_responders(100).unwrap().is_empty());
    let ids: Vec<u32> = data
        .nearby_responders(sefguard_core::DEFAULT_NEARBY_DISTANCE_M)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
