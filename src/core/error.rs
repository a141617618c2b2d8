use thiserror::Error;

use crate::models::Criterion;

/// Errors raised by the ranking pipeline
///
/// Every variant is a caller data-contract violation; none of them is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Unknown request category: {0}")]
    UnknownCategory(String),

    #[error("Empty candidate set")]
    EmptyCandidateSet,

    #[error("Malformed comparison matrix: {0}")]
    MalformedComparisonMatrix(String),

    #[error("Invalid {criterion} value {value} for candidate {candidate_id}")]
    InvalidCriterionValue {
        candidate_id: String,
        criterion: Criterion,
        value: f64,
    },

    #[error("Decision matrix has {ids} identifiers but {rows} rows")]
    DimensionMismatch { ids: usize, rows: usize },
}

impl RankingError {
    /// Stable machine-readable code for API error documents
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "invalid_coordinate",
            Self::UnknownCategory(_) => "unknown_category",
            Self::EmptyCandidateSet => "empty_candidate_set",
            Self::MalformedComparisonMatrix(_) => "malformed_comparison_matrix",
            Self::InvalidCriterionValue { .. } => "invalid_criterion_value",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
        }
    }
}
