//! Courier Rank - multi-criteria ranking of couriers for a delivery request
//!
//! The pipeline filters candidates by distance to the pickup point, derives
//! criterion weights with the Analytic Hierarchy Process and scores the
//! survivors with TOPSIS. Every call is a pure function of its inputs.

pub mod config;
pub mod core;
pub mod models;

// Re-export commonly used types
pub use crate::core::{haversine_distance, AhpWeightEngine, Orchestrator, RankingError, RankingOutcome};
pub use crate::models::{
    CandidateProvider, Coordinate, RankedEntry, RankingMetadata, RankingOptions, RankingRequest,
    RankingResponse, RequestCategory, ServiceRequest,
};
