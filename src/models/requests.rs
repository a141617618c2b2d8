use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::VehicleScores;
use crate::core::error::RankingError;
use crate::models::domain::{
    CandidateProvider, Coordinate, Criterion, RankingOptions, ServiceRequest, VehicleType,
};

/// Ranking request document as received from the API layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankingRequest {
    #[validate(nested)]
    pub request: ServiceRequestDocument,
    #[validate(length(min = 1), nested)]
    pub candidates: Vec<CandidateDocument>,
    #[serde(default)]
    #[validate(nested)]
    pub options: Option<RankingOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequestDocument {
    #[validate(length(min = 1))]
    pub id: String,
    /// Parsed into a `RequestCategory` on conversion
    pub category: String,
    #[validate(custom(function = "validate_coordinate_range"))]
    pub pickup: Coordinate,
    #[serde(default)]
    pub dropoff: Option<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_vehicle_information"))]
pub struct CandidateDocument {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(custom(function = "validate_coordinate_range"))]
    pub position: Coordinate,
    #[validate(range(min = 0.0, max = 10.0))]
    pub reputation: f64,
    #[validate(range(min = 0.0))]
    pub capacity_kg: f64,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    /// Explicit score; takes precedence over the vehicle type table
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub vehicle_suitability_score: Option<f64>,
}

fn validate_coordinate_range(coord: &Coordinate) -> Result<(), ValidationError> {
    if !coord.is_valid() {
        return Err(ValidationError::new("coordinate_out_of_range"));
    }
    Ok(())
}

fn validate_vehicle_information(candidate: &CandidateDocument) -> Result<(), ValidationError> {
    if candidate.vehicle_type.is_none() && candidate.vehicle_suitability_score.is_none() {
        return Err(ValidationError::new("missing_vehicle_information"));
    }
    Ok(())
}

impl ServiceRequestDocument {
    pub fn into_request(self) -> Result<ServiceRequest, RankingError> {
        Ok(ServiceRequest {
            id: self.id,
            category: self.category.parse()?,
            pickup: self.pickup,
            dropoff: self.dropoff,
        })
    }
}

impl CandidateDocument {
    /// Resolve the suitability score and produce the ranking input
    pub fn into_candidate(self, vehicles: &VehicleScores) -> Result<CandidateProvider, RankingError> {
        let vehicle_suitability = self
            .vehicle_suitability_score
            .or_else(|| self.vehicle_type.map(|v| vehicles.score_for(v)))
            .ok_or_else(|| RankingError::InvalidCriterionValue {
                candidate_id: self.id.clone(),
                criterion: Criterion::VehicleSuitability,
                value: f64::NAN,
            })?;

        Ok(CandidateProvider {
            id: self.id,
            position: self.position,
            reputation: self.reputation,
            capacity_kg: self.capacity_kg,
            vehicle_type: self.vehicle_type,
            vehicle_suitability,
        })
    }
}

impl RankingRequest {
    /// Split the document into the typed inputs of the orchestrator
    ///
    /// Options present in the document replace `defaults` entirely.
    pub fn into_parts(
        self,
        vehicles: &VehicleScores,
        defaults: RankingOptions,
    ) -> Result<(ServiceRequest, Vec<CandidateProvider>, RankingOptions), RankingError> {
        let request = self.request.into_request()?;
        let candidates = self
            .candidates
            .into_iter()
            .map(|c| c.into_candidate(vehicles))
            .collect::<Result<Vec<_>, _>>()?;
        let options = self.options.unwrap_or(defaults);

        Ok((request, candidates, options))
    }
}
