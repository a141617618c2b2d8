use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::core::error::RankingError;

/// Number of ranking criteria (columns of the decision matrix)
pub const CRITERIA_COUNT: usize = 4;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when latitude is within [-90, 90] and longitude within [-180, 180]
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Service level of a request; drives both the spatial tolerance and the AHP judgments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Standard,
    Express,
    #[serde(alias = "sameday")]
    SameDay,
}

impl RequestCategory {
    pub const ALL: [RequestCategory; 3] = [Self::Standard, Self::Express, Self::SameDay];

    /// Maximum courier-to-pickup distance (km) for this category
    pub fn tolerance_km(self) -> f64 {
        match self {
            Self::Standard => 10.0,
            Self::Express => 5.0,
            Self::SameDay => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::SameDay => "same_day",
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestCategory {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "same_day" | "sameday" => Ok(Self::SameDay),
            _ => Err(RankingError::UnknownCategory(s.to_string())),
        }
    }
}

/// Vehicle a courier operates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[serde(alias = "velo")]
    Bike,
    Moto,
    #[serde(alias = "voiture")]
    Car,
    Van,
    #[serde(alias = "camion")]
    Truck,
}

/// A delivery request to be served by one of the candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub category: RequestCategory,
    pub pickup: Coordinate,
    #[serde(default)]
    pub dropoff: Option<Coordinate>,
}

/// A courier competing for a request
///
/// `vehicle_suitability` is already resolved by the caller; the ranking core
/// never maps vehicle types to scores itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProvider {
    pub id: String,
    pub position: Coordinate,
    pub reputation: f64,
    pub capacity_kg: f64,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    pub vehicle_suitability: f64,
}

/// Whether a criterion should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    Benefit,
    Cost,
}

/// Decision matrix columns, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Proximity,
    Reputation,
    Capacity,
    VehicleSuitability,
}

impl Criterion {
    pub const ALL: [Criterion; CRITERIA_COUNT] = [
        Self::Proximity,
        Self::Reputation,
        Self::Capacity,
        Self::VehicleSuitability,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn kind(self) -> CriterionKind {
        match self {
            Self::Proximity => CriterionKind::Cost,
            _ => CriterionKind::Benefit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Proximity => "proximity",
            Self::Reputation => "reputation",
            Self::Capacity => "capacity",
            Self::VehicleSuitability => "vehicle_suitability",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per criterion, named for serialization
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CriterionValues {
    pub proximity: f64,
    pub reputation: f64,
    pub capacity: f64,
    pub vehicle_suitability: f64,
}

impl CriterionValues {
    pub fn from_array(values: [f64; CRITERIA_COUNT]) -> Self {
        Self {
            proximity: values[0],
            reputation: values[1],
            capacity: values[2],
            vehicle_suitability: values[3],
        }
    }

    pub fn to_array(&self) -> [f64; CRITERIA_COUNT] {
        [self.proximity, self.reputation, self.capacity, self.vehicle_suitability]
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.to_array()[criterion.index()]
    }
}

/// Criterion weights derived by AHP; non-negative and summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(CriterionValues);

impl WeightVector {
    pub fn new(values: [f64; CRITERIA_COUNT]) -> Self {
        Self(CriterionValues::from_array(values))
    }

    /// Equal weight on every criterion
    pub fn uniform() -> Self {
        Self::new([1.0 / CRITERIA_COUNT as f64; CRITERIA_COUNT])
    }

    pub fn values(&self) -> &CriterionValues {
        &self.0
    }

    pub fn to_array(&self) -> [f64; CRITERIA_COUNT] {
        self.0.to_array()
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0.get(criterion)
    }

    pub fn sum(&self) -> f64 {
        self.to_array().iter().sum()
    }
}

/// Saaty consistency check of a pairwise comparison matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyDiagnostic {
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: f64,
    pub consistency_ratio: f64,
    pub coherent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub candidate_id: String,
    pub distance_km: f64,
}

/// Counters emitted by the spatial filter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterStatistics {
    pub total: usize,
    pub eligible: usize,
    pub rejected: usize,
    #[serde(default)]
    pub rejected_candidates: Vec<RejectedCandidate>,
}

/// Intermediate TOPSIS values for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub raw: CriterionValues,
    pub normalized: CriterionValues,
    pub weighted: CriterionValues,
    pub distance_to_ideal: f64,
    pub distance_to_anti_ideal: f64,
}

/// A ranked candidate; rank 1 is the best
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub candidate_id: String,
    pub rank: usize,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ScoreDetails>,
}

/// Diagnostics describing how a ranking was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    pub category: RequestCategory,
    pub tolerance_km: f64,
    pub statistics: FilterStatistics,
    pub weights: WeightVector,
    pub consistency: ConsistencyDiagnostic,
    pub processing_ms: f64,
}

/// Per-call knobs for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct RankingOptions {
    /// Keep only the best `top_k` entries; `None` keeps all of them
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub include_details: bool,
}
