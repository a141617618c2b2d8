// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateProvider, ConsistencyDiagnostic, Coordinate, Criterion, CriterionKind,
    CriterionValues, FilterStatistics, RankedEntry, RankingMetadata,
    RankingOptions, RejectedCandidate, RequestCategory, ScoreDetails, ServiceRequest, VehicleType,
    WeightVector, CRITERIA_COUNT,
};
pub use requests::{CandidateDocument, RankingRequest, ServiceRequestDocument};
pub use responses::{ErrorResponse, RankingResponse};
