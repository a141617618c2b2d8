// Core algorithm exports
pub mod ahp;
pub mod criteria;
pub mod distance;
pub mod error;
pub mod filters;
pub mod orchestrator;
pub mod topsis;

pub use ahp::{AhpOutcome, AhpWeightEngine, ComparisonMatrices, ComparisonMatrix, PairwiseJudgments};
pub use criteria::DecisionMatrix;
pub use distance::{haversine_distance, EARTH_RADIUS_KM};
pub use error::RankingError;
pub use filters::{filter_candidates, filter_within, EligibleCandidate, FilterOutcome};
pub use orchestrator::{Orchestrator, RankingOutcome};
