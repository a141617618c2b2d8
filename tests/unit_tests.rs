// Unit tests for Courier Rank

use courier_rank::core::{
    ahp::{self, ComparisonMatrix, PairwiseJudgments},
    distance::{destination, haversine_distance},
    filters::{filter_candidates, is_within_tolerance},
    topsis, AhpWeightEngine, DecisionMatrix, RankingError,
};
use courier_rank::models::{
    CandidateProvider, Coordinate, Criterion, RequestCategory, ServiceRequest, WeightVector,
};

fn create_candidate(id: &str, lat: f64, lon: f64) -> CandidateProvider {
    CandidateProvider {
        id: id.to_string(),
        position: Coordinate::new(lat, lon),
        reputation: 7.5,
        capacity_kg: 50.0,
        vehicle_type: None,
        vehicle_suitability: 0.8,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let p = Coordinate::new(40.7128, -74.0060);
    assert_eq!(haversine_distance(p, p).unwrap(), 0.0);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    let manhattan = Coordinate::new(40.7580, -73.9855);
    let brooklyn = Coordinate::new(40.6782, -73.9442);

    let distance = haversine_distance(manhattan, brooklyn).unwrap();
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_haversine_across_antimeridian() {
    let west = Coordinate::new(0.0, 179.95);
    let east = Coordinate::new(0.0, -179.95);

    let distance = haversine_distance(west, east).unwrap();
    assert!((distance - 11.12).abs() < 0.05, "got {}", distance);
}

#[test]
fn test_haversine_rejects_out_of_range() {
    let ok = Coordinate::new(0.0, 0.0);
    assert!(haversine_distance(Coordinate::new(90.5, 0.0), ok).is_err());
    assert!(haversine_distance(ok, Coordinate::new(0.0, -180.5)).is_err());
    assert!(haversine_distance(Coordinate::new(f64::NAN, 0.0), ok).is_err());
    assert!(haversine_distance(Coordinate::new(90.0, 180.0), ok).is_ok());
}

#[test]
fn test_tolerance_boundary_inclusive() {
    assert!(is_within_tolerance(5.0, 5.0));
    assert!(!is_within_tolerance(5.000001, 5.0));
}

#[test]
fn test_filter_uses_category_tolerance() {
    let pickup = Coordinate::new(48.8566, 2.3522);
    let at_4km = destination(pickup, 90.0, 4.0).unwrap();
    let at_7km = destination(pickup, 90.0, 7.0).unwrap();
    let candidates = vec![
        create_candidate("near", at_4km.lat, at_4km.lon),
        create_candidate("mid", at_7km.lat, at_7km.lon),
    ];

    let eligible_count = |category| {
        let request = ServiceRequest {
            id: "r".to_string(),
            category,
            pickup,
            dropoff: None,
        };
        filter_candidates(&request, &candidates).unwrap().statistics.eligible
    };

    assert_eq!(eligible_count(RequestCategory::Standard), 2);
    assert_eq!(eligible_count(RequestCategory::Express), 1);
    assert_eq!(eligible_count(RequestCategory::SameDay), 0);
}

#[test]
fn test_category_parsing() {
    assert_eq!("Express".parse::<RequestCategory>().unwrap(), RequestCategory::Express);
    assert_eq!(" same_day ".parse::<RequestCategory>().unwrap(), RequestCategory::SameDay);
    assert_eq!(
        "overnight".parse::<RequestCategory>().unwrap_err(),
        RankingError::UnknownCategory("overnight".to_string())
    );
}

#[test]
fn test_default_weights_per_category() {
    let engine = AhpWeightEngine::default();
    let mut previous_proximity = 0.0;

    for category in [RequestCategory::Standard, RequestCategory::Express, RequestCategory::SameDay] {
        let outcome = engine.weights_for(category);
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);
        assert!(outcome.weights.to_array().iter().all(|w| *w >= 0.0));
        assert!(outcome.consistency.coherent, "{} should be coherent", category);

        // Tighter service levels put more weight on proximity
        let proximity = outcome.weights.get(Criterion::Proximity);
        assert!(proximity > previous_proximity);
        previous_proximity = proximity;
    }
}

#[test]
fn test_standard_weights_close_to_reference() {
    let matrix = ComparisonMatrix::from_judgments(&PairwiseJudgments::standard()).unwrap();
    let outcome = ahp::evaluate(&matrix);
    let w = outcome.weights.to_array();

    assert!((w[0] - 0.48).abs() < 0.02);
    assert!((w[1] - 0.27).abs() < 0.02);
    assert!((w[2] - 0.16).abs() < 0.02);
    assert!((w[3] - 0.09).abs() < 0.02);
    assert!(outcome.consistency.consistency_ratio < 0.02);
    assert_eq!(outcome.consistency.random_index, 0.90);
}

#[test]
fn test_cyclic_judgments_flagged_incoherent() {
    let judgments = PairwiseJudgments {
        proximity_vs_reputation: 9.0,
        proximity_vs_capacity: 1.0 / 9.0,
        proximity_vs_vehicle: 1.0,
        reputation_vs_capacity: 9.0,
        reputation_vs_vehicle: 1.0,
        capacity_vs_vehicle: 1.0,
    };
    let outcome = ahp::evaluate(&ComparisonMatrix::from_judgments(&judgments).unwrap());

    assert!(outcome.consistency.consistency_ratio >= 0.10);
    assert!(!outcome.consistency.coherent);
    // Weights are still produced
    assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn test_non_reciprocal_matrix_rejected() {
    let mut values = [[1.0; 4]; 4];
    values[0][1] = 3.0;
    values[1][0] = 0.5;

    assert!(matches!(
        ComparisonMatrix::new(values),
        Err(RankingError::MalformedComparisonMatrix(_))
    ));
}

#[test]
fn test_topsis_prefers_dominant_candidate() {
    let matrix = DecisionMatrix::from_rows(
        vec!["strong".to_string(), "weak".to_string(), "middle".to_string()],
        vec![
            [0.5, 9.0, 100.0, 1.0],
            [4.5, 3.0, 10.0, 0.1],
            [2.0, 6.0, 50.0, 0.8],
        ],
    )
    .unwrap();

    let ranked = topsis::rank(&matrix, &WeightVector::uniform(), false);

    assert_eq!(ranked[0].candidate_id, "strong");
    assert_eq!(ranked[0].score, 1.0);
    assert_eq!(ranked[1].candidate_id, "middle");
    assert_eq!(ranked[2].candidate_id, "weak");
    assert_eq!(ranked[2].score, 0.0);
    assert!(ranked.iter().all(|e| e.details.is_none()));
}

#[test]
fn test_topsis_identical_rows_score_one() {
    let matrix = DecisionMatrix::from_rows(
        vec!["b".to_string(), "a".to_string()],
        vec![[1.0, 5.0, 20.0, 0.3], [1.0, 5.0, 20.0, 0.3]],
    )
    .unwrap();

    let ranked = topsis::rank(&matrix, &WeightVector::uniform(), true);

    assert_eq!(ranked[0].candidate_id, "a");
    assert_eq!(ranked[0].score, 1.0);
    assert_eq!(ranked[1].score, 1.0);
    assert_eq!(ranked[1].rank, 2);
}

#[test]
fn test_decision_matrix_rejects_zero_capacity() {
    let err = DecisionMatrix::from_rows(vec!["x".to_string()], vec![[1.0, 5.0, 0.0, 0.3]]).unwrap_err();
    assert!(matches!(
        err,
        RankingError::InvalidCriterionValue { criterion: Criterion::Capacity, .. }
    ));
}
