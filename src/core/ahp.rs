//! Analytic Hierarchy Process: criterion weights from pairwise judgments.
//!
//! Weights come from the normalized-column-average approximation of the
//! principal eigenvector. The consistency ratio is reported alongside the
//! weights and never prevents them from being used.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::RankingError;
use crate::models::{ConsistencyDiagnostic, RequestCategory, WeightVector, CRITERIA_COUNT};

/// CR strictly below this value is considered coherent
pub const CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Relative tolerance used for the reciprocity check
const RECIPROCITY_TOLERANCE: f64 = 1e-9;

/// Saaty's random consistency index for an `n x n` matrix
pub fn random_index(n: usize) -> f64 {
    match n {
        0..=2 => 0.0,
        3 => 0.58,
        4 => 0.90,
        5 => 1.12,
        6 => 1.24,
        7 => 1.32,
        8 => 1.41,
        9 => 1.45,
        _ => 1.49,
    }
}

/// Upper-triangle judgments on the 1-9 Saaty scale
///
/// Each value says how much more important the first criterion is than the
/// second; values below 1 express the opposite preference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseJudgments {
    pub proximity_vs_reputation: f64,
    pub proximity_vs_capacity: f64,
    pub proximity_vs_vehicle: f64,
    pub reputation_vs_capacity: f64,
    pub reputation_vs_vehicle: f64,
    pub capacity_vs_vehicle: f64,
}

impl PairwiseJudgments {
    /// Balanced: proximity first, the rest close together
    pub fn standard() -> Self {
        Self {
            proximity_vs_reputation: 2.0,
            proximity_vs_capacity: 3.0,
            proximity_vs_vehicle: 5.0,
            reputation_vs_capacity: 2.0,
            reputation_vs_vehicle: 3.0,
            capacity_vs_vehicle: 2.0,
        }
    }

    pub fn express() -> Self {
        Self {
            proximity_vs_reputation: 4.0,
            proximity_vs_capacity: 5.0,
            proximity_vs_vehicle: 6.0,
            reputation_vs_capacity: 2.0,
            reputation_vs_vehicle: 3.0,
            capacity_vs_vehicle: 2.0,
        }
    }

    pub fn same_day() -> Self {
        Self {
            proximity_vs_reputation: 6.0,
            proximity_vs_capacity: 7.0,
            proximity_vs_vehicle: 7.0,
            reputation_vs_capacity: 2.0,
            reputation_vs_vehicle: 2.0,
            capacity_vs_vehicle: 1.0,
        }
    }

    pub fn for_category(category: RequestCategory) -> Self {
        match category {
            RequestCategory::Standard => Self::standard(),
            RequestCategory::Express => Self::express(),
            RequestCategory::SameDay => Self::same_day(),
        }
    }
}

/// Validated reciprocal pairwise-comparison matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonMatrix([[f64; CRITERIA_COUNT]; CRITERIA_COUNT]);

impl ComparisonMatrix {
    /// Validate a full matrix
    ///
    /// # Errors
    /// `MalformedComparisonMatrix` when an entry is non-positive or not
    /// finite, the diagonal is not 1, or `m[i][j] != 1 / m[j][i]`.
    pub fn new(values: [[f64; CRITERIA_COUNT]; CRITERIA_COUNT]) -> Result<Self, RankingError> {
        for (i, row) in values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() || v <= 0.0 {
                    return Err(RankingError::MalformedComparisonMatrix(format!(
                        "entry [{}][{}] = {} is not a positive finite number",
                        i, j, v
                    )));
                }
            }
        }

        for i in 0..CRITERIA_COUNT {
            if !approx_eq(values[i][i], 1.0) {
                return Err(RankingError::MalformedComparisonMatrix(format!(
                    "diagonal entry [{}][{}] = {} is not 1",
                    i, i, values[i][i]
                )));
            }
            for j in (i + 1)..CRITERIA_COUNT {
                if !approx_eq(values[i][j] * values[j][i], 1.0) {
                    return Err(RankingError::MalformedComparisonMatrix(format!(
                        "entries [{}][{}] = {} and [{}][{}] = {} are not reciprocal",
                        i, j, values[i][j], j, i, values[j][i]
                    )));
                }
            }
        }

        Ok(Self(values))
    }

    /// Build the matrix from upper-triangle judgments, filling in reciprocals
    pub fn from_judgments(judgments: &PairwiseJudgments) -> Result<Self, RankingError> {
        for (i, j, v) in upper_triangle(judgments) {
            if !v.is_finite() || v <= 0.0 {
                return Err(RankingError::MalformedComparisonMatrix(format!(
                    "judgment [{}][{}] = {} is not a positive finite number",
                    i, j, v
                )));
            }
        }

        Self::new(fill_reciprocal(judgments))
    }

    pub fn values(&self) -> &[[f64; CRITERIA_COUNT]; CRITERIA_COUNT] {
        &self.0
    }
}

fn upper_triangle(judgments: &PairwiseJudgments) -> [(usize, usize, f64); 6] {
    [
        (0, 1, judgments.proximity_vs_reputation),
        (0, 2, judgments.proximity_vs_capacity),
        (0, 3, judgments.proximity_vs_vehicle),
        (1, 2, judgments.reputation_vs_capacity),
        (1, 3, judgments.reputation_vs_vehicle),
        (2, 3, judgments.capacity_vs_vehicle),
    ]
}

fn fill_reciprocal(judgments: &PairwiseJudgments) -> [[f64; CRITERIA_COUNT]; CRITERIA_COUNT] {
    let mut values = [[1.0; CRITERIA_COUNT]; CRITERIA_COUNT];
    for (i, j, v) in upper_triangle(judgments) {
        values[i][j] = v;
        values[j][i] = 1.0 / v;
    }
    values
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= RECIPROCITY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Weights and diagnostic derived from one comparison matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AhpOutcome {
    pub weights: WeightVector,
    pub consistency: ConsistencyDiagnostic,
}

/// Column-normalize, then average each row; renormalized to sum to 1
pub fn derive_weights(matrix: &ComparisonMatrix) -> WeightVector {
    let m = matrix.values();

    let mut column_sums = [0.0; CRITERIA_COUNT];
    for row in m {
        for (j, v) in row.iter().enumerate() {
            column_sums[j] += v;
        }
    }

    let mut weights = [0.0; CRITERIA_COUNT];
    for (i, row) in m.iter().enumerate() {
        let normalized_sum: f64 = row.iter().zip(&column_sums).map(|(v, s)| v / s).sum();
        weights[i] = normalized_sum / CRITERIA_COUNT as f64;
    }

    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }

    WeightVector::new(weights)
}

/// λ_max, CI and CR of `matrix` for the given weights
pub fn check_consistency(matrix: &ComparisonMatrix, weights: &WeightVector) -> ConsistencyDiagnostic {
    let m = matrix.values();
    let w = weights.to_array();
    let n = CRITERIA_COUNT as f64;

    let lambda_max = m
        .iter()
        .zip(&w)
        .map(|(row, wi)| {
            let weighted_sum: f64 = row.iter().zip(&w).map(|(a, wj)| a * wj).sum();
            weighted_sum / wi
        })
        .sum::<f64>()
        / n;

    let consistency_index = (lambda_max - n) / (n - 1.0);
    let random_index = random_index(CRITERIA_COUNT);
    let consistency_ratio = if random_index > 0.0 {
        consistency_index / random_index
    } else {
        0.0
    };

    ConsistencyDiagnostic {
        lambda_max,
        consistency_index,
        random_index,
        consistency_ratio,
        coherent: consistency_ratio < CONSISTENCY_THRESHOLD,
    }
}

/// Full AHP evaluation of a comparison matrix
pub fn evaluate(matrix: &ComparisonMatrix) -> AhpOutcome {
    let weights = derive_weights(matrix);
    let consistency = check_consistency(matrix, &weights);

    debug!(
        "AHP: lambda_max={:.4}, CI={:.4}, RI={:.2}, CR={:.4}",
        consistency.lambda_max,
        consistency.consistency_index,
        consistency.random_index,
        consistency.consistency_ratio
    );

    AhpOutcome {
        weights,
        consistency,
    }
}

/// Comparison matrices for every request category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonMatrices {
    pub standard: ComparisonMatrix,
    pub express: ComparisonMatrix,
    pub same_day: ComparisonMatrix,
}

impl ComparisonMatrices {
    pub fn from_judgments(
        standard: &PairwiseJudgments,
        express: &PairwiseJudgments,
        same_day: &PairwiseJudgments,
    ) -> Result<Self, RankingError> {
        Ok(Self {
            standard: ComparisonMatrix::from_judgments(standard)?,
            express: ComparisonMatrix::from_judgments(express)?,
            same_day: ComparisonMatrix::from_judgments(same_day)?,
        })
    }
}

impl Default for ComparisonMatrices {
    fn default() -> Self {
        let build = |category| ComparisonMatrix(fill_reciprocal(&PairwiseJudgments::for_category(category)));
        Self {
            standard: build(RequestCategory::Standard),
            express: build(RequestCategory::Express),
            same_day: build(RequestCategory::SameDay),
        }
    }
}

/// Per-category weight lookup, evaluated once at construction
///
/// Immutable after `new`; share it freely between threads.
#[derive(Debug, Clone)]
pub struct AhpWeightEngine {
    standard: AhpOutcome,
    express: AhpOutcome,
    same_day: AhpOutcome,
}

impl AhpWeightEngine {
    pub fn new(matrices: ComparisonMatrices) -> Self {
        let engine = Self {
            standard: evaluate(&matrices.standard),
            express: evaluate(&matrices.express),
            same_day: evaluate(&matrices.same_day),
        };

        for category in RequestCategory::ALL {
            let outcome = engine.weights_for(category);
            info!(
                "AHP weights for {}: {:?} (CR={:.4})",
                category,
                outcome.weights.values(),
                outcome.consistency.consistency_ratio
            );
            if !outcome.consistency.coherent {
                warn!(
                    "AHP matrix for {} is NOT coherent (CR={:.4} >= {}); weights are still used",
                    category, outcome.consistency.consistency_ratio, CONSISTENCY_THRESHOLD
                );
            }
        }

        engine
    }

    pub fn weights_for(&self, category: RequestCategory) -> &AhpOutcome {
        match category {
            RequestCategory::Standard => &self.standard,
            RequestCategory::Express => &self.express,
            RequestCategory::SameDay => &self.same_day,
        }
    }
}

impl Default for AhpWeightEngine {
    fn default() -> Self {
        Self::new(ComparisonMatrices::default())
    }
}
