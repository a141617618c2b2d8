use tracing::{debug, info};

use crate::core::distance::{haversine_distance, validate_coordinate};
use crate::core::error::RankingError;
use crate::models::{
    CandidateProvider, Coordinate, FilterStatistics, RejectedCandidate, ServiceRequest,
};

/// Candidate that passed the spatial filter, with its distance to pickup
#[derive(Debug, Clone, Copy)]
pub struct EligibleCandidate<'a> {
    pub candidate: &'a CandidateProvider,
    pub distance_km: f64,
}

/// Result of the spatial filtering stage
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub tolerance_km: f64,
    /// Eligible candidates in input order
    pub eligible: Vec<EligibleCandidate<'a>>,
    pub statistics: FilterStatistics,
}

/// Inclusive tolerance check
#[inline]
pub fn is_within_tolerance(distance_km: f64, tolerance_km: f64) -> bool {
    distance_km <= tolerance_km
}

/// Keep the candidates close enough to the request's pickup point
///
/// The tolerance comes from the request category alone.
pub fn filter_candidates<'a>(
    request: &ServiceRequest,
    candidates: &'a [CandidateProvider],
) -> Result<FilterOutcome<'a>, RankingError> {
    filter_within(request.pickup, candidates, request.category.tolerance_km())
}

/// Keep the candidates whose distance to `pickup` is at most `tolerance_km`
///
/// # Arguments
/// * `pickup` - Reference point of the request
/// * `candidates` - Candidates to check, in caller order
/// * `tolerance_km` - Maximum eligible distance, inclusive
///
/// # Returns
/// Eligible candidates in input order with their distances, plus counters and
/// the rejected list
///
/// # Errors
/// `InvalidCoordinate` for an out-of-range pickup or candidate position; the
/// first offending coordinate aborts the whole call.
pub fn filter_within<'a>(
    pickup: Coordinate,
    candidates: &'a [CandidateProvider],
    tolerance_km: f64,
) -> Result<FilterOutcome<'a>, RankingError> {
    let pickup = validate_coordinate(pickup)?;

    info!(
        "Filtering {} candidates with tolerance {} km",
        candidates.len(),
        tolerance_km
    );

    let mut eligible = Vec::with_capacity(candidates.len());
    let mut rejected_candidates = Vec::new();

    for candidate in candidates {
        let distance_km = haversine_distance(candidate.position, pickup)?;
        if is_within_tolerance(distance_km, tolerance_km) {
            debug!(
                "Candidate {} ELIGIBLE: {:.3} km <= {} km",
                candidate.id, distance_km, tolerance_km
            );
            eligible.push(EligibleCandidate {
                candidate,
                distance_km,
            });
        } else {
            debug!(
                "Candidate {} REJECTED: {:.3} km > {} km",
                candidate.id, distance_km, tolerance_km
            );
            rejected_candidates.push(RejectedCandidate {
                candidate_id: candidate.id.clone(),
                distance_km,
            });
        }
    }

    let statistics = FilterStatistics {
        total: candidates.len(),
        eligible: eligible.len(),
        rejected: rejected_candidates.len(),
        rejected_candidates,
    };

    info!(
        "Spatial filtering complete: {} eligible, {} rejected",
        statistics.eligible, statistics.rejected
    );

    Ok(FilterOutcome {
        tolerance_km,
        eligible,
        statistics,
    })
}
