use std::time::Instant;

use tracing::{info, warn};

use crate::core::{
    ahp::{AhpWeightEngine, CONSISTENCY_THRESHOLD},
    criteria::DecisionMatrix,
    error::RankingError,
    filters::filter_candidates,
    topsis,
};
use crate::models::{CandidateProvider, RankedEntry, RankingMetadata, RankingOptions, ServiceRequest};

/// Result of one ranking call
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub request_id: String,
    pub entries: Vec<RankedEntry>,
    pub metadata: RankingMetadata,
    pub warnings: Vec<String>,
}

/// Runs the ranking pipeline for one request at a time
///
/// # Pipeline Stages
/// 1. Spatial filtering by category tolerance
/// 2. Decision matrix construction
/// 3. AHP weight lookup for the request category
/// 4. TOPSIS scoring and ranking
///
/// Holds only the immutable AHP configuration, so a single instance can serve
/// concurrent calls from any number of threads.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    ahp: AhpWeightEngine,
}

impl Orchestrator {
    pub fn new(ahp: AhpWeightEngine) -> Self {
        Self { ahp }
    }

    /// Rank `candidates` for `request`
    ///
    /// Zero eligible candidates is a valid outcome and yields an empty ranking
    /// with full metadata.
    ///
    /// # Arguments
    /// * `request` - Category and pickup point
    /// * `candidates` - Snapshot of the available couriers
    /// * `options` - `top_k` truncation and score details
    ///
    /// # Returns
    /// Ranked entries, metadata (tolerance, counters, weights, consistency,
    /// duration) and warnings
    ///
    /// # Errors
    /// - `EmptyCandidateSet` if `candidates` is empty
    /// - `InvalidCoordinate` for an out-of-range pickup or candidate position
    /// - `InvalidCriterionValue` for unusable reputation, capacity or
    ///   suitability values of an eligible candidate
    pub fn rank(
        &self,
        request: &ServiceRequest,
        candidates: &[CandidateProvider],
        options: &RankingOptions,
    ) -> Result<RankingOutcome, RankingError> {
        let started = Instant::now();

        info!(
            "Starting ranking for request {} ({}) with {} candidates",
            request.id,
            request.category,
            candidates.len()
        );

        if candidates.is_empty() {
            return Err(RankingError::EmptyCandidateSet);
        }

        let filtered = filter_candidates(request, candidates)?;
        let ahp = self.ahp.weights_for(request.category);

        let mut warnings = Vec::new();
        if !ahp.consistency.coherent {
            warnings.push(format!(
                "AHP comparison matrix for {} is not coherent (CR={:.4} >= {}); results may be less reliable",
                request.category, ahp.consistency.consistency_ratio, CONSISTENCY_THRESHOLD
            ));
        }

        let entries = if filtered.eligible.is_empty() {
            warn!("No eligible candidates for request {} after spatial filtering", request.id);
            warnings.push(format!(
                "No candidate within {} km of the pickup point",
                filtered.tolerance_km
            ));
            Vec::new()
        } else {
            let matrix = DecisionMatrix::build(&filtered.eligible)?;
            let mut ranked = topsis::rank(&matrix, &ahp.weights, options.include_details);
            if let Some(k) = options.top_k {
                ranked.truncate(k);
            }
            ranked
        };

        let processing_ms = started.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Ranking complete for {}: {} candidates ranked in {:.3}ms",
            request.id,
            entries.len(),
            processing_ms
        );

        Ok(RankingOutcome {
            request_id: request.id.clone(),
            entries,
            metadata: RankingMetadata {
                category: request.category,
                tolerance_km: filtered.tolerance_km,
                statistics: filtered.statistics,
                weights: ahp.weights,
                consistency: ahp.consistency,
                processing_ms,
            },
            warnings,
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(AhpWeightEngine::default())
    }
}
