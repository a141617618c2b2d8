use tracing::debug;

use crate::core::error::RankingError;
use crate::core::filters::EligibleCandidate;
use crate::models::{Criterion, CRITERIA_COUNT};

/// Raw criterion values, one row per eligible candidate
///
/// Row `i` always belongs to `ids[i]`; every later stage keeps that order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    ids: Vec<String>,
    rows: Vec<[f64; CRITERIA_COUNT]>,
}

impl DecisionMatrix {
    /// Build the matrix from the candidates that survived spatial filtering
    ///
    /// Columns: proximity (km to pickup), reputation, capacity (kg),
    /// vehicle suitability.
    pub fn build(eligible: &[EligibleCandidate<'_>]) -> Result<Self, RankingError> {
        let (ids, rows): (Vec<String>, Vec<[f64; CRITERIA_COUNT]>) = eligible
            .iter()
            .map(|e| {
                let c = e.candidate;
                (
                    c.id.clone(),
                    [e.distance_km, c.reputation, c.capacity_kg, c.vehicle_suitability],
                )
            })
            .unzip();

        let matrix = Self::from_rows(ids, rows)?;
        debug!("Decision matrix: {} x {}", matrix.len(), CRITERIA_COUNT);
        Ok(matrix)
    }

    /// Assemble a matrix from pre-computed rows
    ///
    /// # Errors
    /// - `EmptyCandidateSet` when there are no rows
    /// - `DimensionMismatch` when `ids` and `rows` differ in length
    /// - `InvalidCriterionValue` for non-finite or negative values, or a
    ///   capacity that is not strictly positive
    pub fn from_rows(
        ids: Vec<String>,
        rows: Vec<[f64; CRITERIA_COUNT]>,
    ) -> Result<Self, RankingError> {
        if ids.len() != rows.len() {
            return Err(RankingError::DimensionMismatch {
                ids: ids.len(),
                rows: rows.len(),
            });
        }
        if rows.is_empty() {
            return Err(RankingError::EmptyCandidateSet);
        }

        for (id, row) in ids.iter().zip(&rows) {
            for criterion in Criterion::ALL {
                let value = row[criterion.index()];
                if !is_acceptable(criterion, value) {
                    return Err(RankingError::InvalidCriterionValue {
                        candidate_id: id.clone(),
                        criterion,
                        value,
                    });
                }
            }
        }

        Ok(Self { ids, rows })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn rows(&self) -> &[[f64; CRITERIA_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column(&self, criterion: Criterion) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[criterion.index()])
    }
}

#[inline]
fn is_acceptable(criterion: Criterion, value: f64) -> bool {
    match criterion {
        Criterion::Capacity => value.is_finite() && value > 0.0,
        _ => value.is_finite() && value >= 0.0,
    }
}
