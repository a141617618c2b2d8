//! TOPSIS: rank alternatives by relative closeness to the ideal solution.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::core::criteria::DecisionMatrix;
use crate::models::{
    Criterion, CriterionKind, CriterionValues, RankedEntry, ScoreDetails, WeightVector,
    CRITERIA_COUNT,
};

type Row = [f64; CRITERIA_COUNT];

/// Every intermediate TOPSIS result, row-aligned with the decision matrix
#[derive(Debug, Clone, PartialEq)]
pub struct TopsisEvaluation {
    pub normalized: Vec<Row>,
    pub weighted: Vec<Row>,
    pub ideal: Row,
    pub anti_ideal: Row,
    pub distance_to_ideal: Vec<f64>,
    pub distance_to_anti_ideal: Vec<f64>,
    pub scores: Vec<f64>,
}

/// Vector normalization: each entry divided by the Euclidean norm of its column
///
/// A column whose norm is 0 normalizes to all zeros. The norm is folded with
/// `hypot`, so very large or very small magnitudes neither overflow nor
/// underflow.
pub fn normalize(matrix: &DecisionMatrix) -> Vec<Row> {
    let mut norms = [0.0; CRITERIA_COUNT];
    for criterion in Criterion::ALL {
        norms[criterion.index()] = matrix.column(criterion).fold(0.0, f64::hypot);
    }

    matrix
        .rows()
        .iter()
        .map(|row| {
            let mut out = [0.0; CRITERIA_COUNT];
            for j in 0..CRITERIA_COUNT {
                out[j] = if norms[j] == 0.0 { 0.0 } else { row[j] / norms[j] };
            }
            out
        })
        .collect()
}

pub fn apply_weights(normalized: &[Row], weights: &WeightVector) -> Vec<Row> {
    let w = weights.to_array();
    normalized
        .iter()
        .map(|row| {
            let mut out = [0.0; CRITERIA_COUNT];
            for j in 0..CRITERIA_COUNT {
                out[j] = row[j] * w[j];
            }
            out
        })
        .collect()
}

/// Ideal (best) and anti-ideal (worst) value per column
///
/// Best is the max for benefit columns and the min for cost columns.
pub fn ideal_solutions(weighted: &[Row]) -> (Row, Row) {
    let mut ideal = [0.0; CRITERIA_COUNT];
    let mut anti_ideal = [0.0; CRITERIA_COUNT];

    for criterion in Criterion::ALL {
        let j = criterion.index();
        let (min, max) = weighted
            .iter()
            .map(|row| row[j])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        match criterion.kind() {
            CriterionKind::Benefit => {
                ideal[j] = max;
                anti_ideal[j] = min;
            }
            CriterionKind::Cost => {
                ideal[j] = min;
                anti_ideal[j] = max;
            }
        }
    }

    (ideal, anti_ideal)
}

/// Euclidean distance between a weighted row and a reference vector
#[inline]
pub fn separation(row: &Row, reference: &Row) -> f64 {
    row.iter()
        .zip(reference)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Relative closeness `S- / (S+ + S-)`, or 1.0 when both distances are 0
#[inline]
pub fn closeness(distance_to_ideal: f64, distance_to_anti_ideal: f64) -> f64 {
    let total = distance_to_ideal + distance_to_anti_ideal;
    if total == 0.0 {
        return 1.0;
    }
    (distance_to_anti_ideal / total).clamp(0.0, 1.0)
}

/// Run every TOPSIS step and keep the intermediate values
pub fn evaluate(matrix: &DecisionMatrix, weights: &WeightVector) -> TopsisEvaluation {
    let normalized = normalize(matrix);
    let weighted = apply_weights(&normalized, weights);
    let (ideal, anti_ideal) = ideal_solutions(&weighted);

    debug!("TOPSIS ideal: {:?}, anti-ideal: {:?}", ideal, anti_ideal);

    let distance_to_ideal: Vec<f64> = weighted.iter().map(|r| separation(r, &ideal)).collect();
    let distance_to_anti_ideal: Vec<f64> =
        weighted.iter().map(|r| separation(r, &anti_ideal)).collect();

    let scores = distance_to_ideal
        .iter()
        .zip(&distance_to_anti_ideal)
        .map(|(&plus, &minus)| closeness(plus, minus))
        .collect();

    TopsisEvaluation {
        normalized,
        weighted,
        ideal,
        anti_ideal,
        distance_to_ideal,
        distance_to_anti_ideal,
        scores,
    }
}

/// Rank every row of `matrix` by descending closeness
///
/// Equal scores are ordered by ascending candidate identifier, so the
/// result never depends on input order.
///
/// # Arguments
/// * `matrix` - Raw criterion values, one row per candidate
/// * `weights` - Criterion weights summing to 1
/// * `include_details` - Attach intermediate values to every entry
///
/// # Returns
/// One entry per row, best first, with 1-based ranks
pub fn rank(matrix: &DecisionMatrix, weights: &WeightVector, include_details: bool) -> Vec<RankedEntry> {
    let evaluation = evaluate(matrix, weights);
    let ids = matrix.ids();

    let mut order: Vec<usize> = (0..matrix.len()).collect();
    order.sort_by(|&a, &b| compare_entries(evaluation.scores[a], &ids[a], evaluation.scores[b], &ids[b]));

    let ranked: Vec<RankedEntry> = order
        .into_iter()
        .enumerate()
        .map(|(position, i)| RankedEntry {
            candidate_id: ids[i].clone(),
            rank: position + 1,
            score: evaluation.scores[i],
            details: include_details.then(|| ScoreDetails {
                raw: CriterionValues::from_array(matrix.rows()[i]),
                normalized: CriterionValues::from_array(evaluation.normalized[i]),
                weighted: CriterionValues::from_array(evaluation.weighted[i]),
                distance_to_ideal: evaluation.distance_to_ideal[i],
                distance_to_anti_ideal: evaluation.distance_to_anti_ideal[i],
            }),
        })
        .collect();

    if let (Some(top), Some(bottom)) = (ranked.first(), ranked.last()) {
        info!(
            "TOPSIS ranking complete. Top score: {:.4}, lowest score: {:.4}",
            top.score, bottom.score
        );
    }

    ranked
}

#[inline]
fn compare_entries(score_a: f64, id_a: &str, score_b: f64, id_b: &str) -> Ordering {
    score_b.total_cmp(&score_a).then_with(|| id_a.cmp(id_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[(&str, Row)]) -> DecisionMatrix {
        DecisionMatrix::from_rows(
            rows.iter().map(|(id, _)| id.to_string()).collect(),
            rows.iter().map(|(_, r)| *r).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_columns() {
        let m = matrix(&[("a", [3.0, 4.0, 1.0, 0.0]), ("b", [4.0, 3.0, 1.0, 0.0])]);
        let n = normalize(&m);

        assert!((n[0][0] - 0.6).abs() < 1e-12);
        assert!((n[1][0] - 0.8).abs() < 1e-12);
        assert!((n[0][1] - 0.8).abs() < 1e-12);
        // zero column stays zero
        assert_eq!(n[0][3], 0.0);
        assert_eq!(n[1][3], 0.0);
    }

    #[test]
    fn test_ideal_solutions_respect_cost_column() {
        let weighted = vec![[0.1, 0.2, 0.3, 0.4], [0.5, 0.1, 0.6, 0.2]];
        let (ideal, anti) = ideal_solutions(&weighted);

        assert_eq!(ideal, [0.1, 0.2, 0.6, 0.4]);
        assert_eq!(anti, [0.5, 0.1, 0.3, 0.2]);
    }

    #[test]
    fn test_dominant_candidate_wins() {
        let m = matrix(&[
            ("worst", [8.0, 3.0, 10.0, 0.1]),
            ("best", [0.5, 9.5, 200.0, 1.0]),
            ("middle", [2.0, 7.0, 50.0, 0.8]),
        ]);

        let ranked = rank(&m, &WeightVector::uniform(), false);

        assert_eq!(ranked[0].candidate_id, "best");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[2].candidate_id, "worst");
        assert_eq!(ranked[2].score, 0.0);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_closer_is_better_all_else_equal() {
        let m = matrix(&[("far", [4.0, 8.0, 20.0, 0.5]), ("near", [1.0, 8.0, 20.0, 0.5])]);
        let ranked = rank(&m, &WeightVector::new([0.4, 0.3, 0.2, 0.1]), false);
        assert_eq!(ranked[0].candidate_id, "near");
    }

    #[test]
    fn test_single_candidate_scores_one() {
        let m = matrix(&[("only", [2.3, 7.0, 15.0, 0.3])]);
        let ranked = rank(&m, &WeightVector::uniform(), true);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].score, 1.0);
        let details = ranked[0].details.as_ref().unwrap();
        assert_eq!(details.distance_to_ideal, 0.0);
        assert_eq!(details.distance_to_anti_ideal, 0.0);
    }

    #[test]
    fn test_ties_broken_by_identifier() {
        let row = [1.5, 8.0, 30.0, 0.8];
        let m = matrix(&[("zulu", row), ("alpha", row), ("mike", row)]);
        let ranked = rank(&m, &WeightVector::uniform(), false);

        let ids: Vec<&str> = ranked.iter().map(|e| e.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mike", "zulu"]);
        assert!(ranked.iter().all(|e| e.score == ranked[0].score));
    }

    #[test]
    fn test_extreme_capacities_still_count() {
        let m = matrix(&[("big", [1.0, 5.0, 1e200, 0.5]), ("small", [1.0, 5.0, 10.0, 0.5])]);

        let n = normalize(&m);
        assert!((n[0][2] - 1.0).abs() < 1e-12);
        assert!(n[1][2] > 0.0);

        let ranked = rank(&m, &WeightVector::uniform(), false);
        assert_eq!(ranked[0].candidate_id, "big");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_tiny_values_do_not_vanish() {
        let m = matrix(&[("a", [1e-200, 5.0, 10.0, 0.5]), ("b", [3e-200, 5.0, 10.0, 0.5])]);
        let n = normalize(&m);

        assert!(n[0][0] > 0.0 && n[1][0] > n[0][0]);

        let ranked = rank(&m, &WeightVector::uniform(), false);
        assert_eq!(ranked[0].candidate_id, "a");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let m = matrix(&[
            ("a", [1.2, 6.0, 40.0, 0.3]),
            ("b", [0.7, 8.5, 25.0, 0.8]),
            ("c", [3.1, 9.0, 90.0, 1.0]),
        ]);
        let weights = WeightVector::new([0.48, 0.27, 0.16, 0.09]);

        assert_eq!(rank(&m, &weights, true), rank(&m, &weights, true));
    }

    #[test]
    fn test_closeness_degenerate() {
        assert_eq!(closeness(0.0, 0.0), 1.0);
        assert_eq!(closeness(0.0, 0.3), 1.0);
        assert_eq!(closeness(0.3, 0.0), 0.0);
    }
}
