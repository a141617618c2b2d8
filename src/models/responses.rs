use serde::{Deserialize, Serialize};

use crate::core::error::RankingError;
use crate::core::orchestrator::RankingOutcome;
use crate::models::domain::{RankedEntry, RankingMetadata};

/// Response document for a successful ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub status: String,
    pub request_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub ranked: Vec<RankedEntry>,
    pub metadata: RankingMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl From<RankingOutcome> for RankingResponse {
    fn from(outcome: RankingOutcome) -> Self {
        Self {
            status: "success".to_string(),
            request_id: outcome.request_id,
            timestamp: chrono::Utc::now(),
            ranked: outcome.entries,
            metadata: outcome.metadata,
            warnings: (!outcome.warnings.is_empty()).then_some(outcome.warnings),
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
            message: message.into(),
        }
    }
}

impl From<&RankingError> for ErrorResponse {
    fn from(err: &RankingError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
