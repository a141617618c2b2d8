use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::core::ahp::{AhpWeightEngine, ComparisonMatrices, PairwiseJudgments};
use crate::core::error::RankingError;
use crate::models::{RankingOptions, VehicleType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub ahp: AhpSettings,
    #[serde(default)]
    pub vehicles: VehicleScores,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingSettings {
    pub default_top_k: Option<usize>,
    #[serde(default)]
    pub include_details: bool,
}

impl RankingSettings {
    pub fn default_options(&self) -> RankingOptions {
        RankingOptions {
            top_k: self.default_top_k,
            include_details: self.include_details,
        }
    }
}

/// Pairwise judgments per request category
#[derive(Debug, Clone, Deserialize)]
pub struct AhpSettings {
    #[serde(default = "PairwiseJudgments::standard")]
    pub standard: PairwiseJudgments,
    #[serde(default = "PairwiseJudgments::express")]
    pub express: PairwiseJudgments,
    #[serde(default = "PairwiseJudgments::same_day")]
    pub same_day: PairwiseJudgments,
}

impl Default for AhpSettings {
    fn default() -> Self {
        Self {
            standard: PairwiseJudgments::standard(),
            express: PairwiseJudgments::express(),
            same_day: PairwiseJudgments::same_day(),
        }
    }
}

impl AhpSettings {
    /// Validate the judgments and precompute the weights for every category
    pub fn build_engine(&self) -> Result<AhpWeightEngine, RankingError> {
        let matrices = ComparisonMatrices::from_judgments(&self.standard, &self.express, &self.same_day)?;
        Ok(AhpWeightEngine::new(matrices))
    }
}

/// Vehicle type to suitability score, used when a candidate carries no explicit score
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleScores {
    #[serde(default = "default_bike_score")]
    pub bike: f64,
    #[serde(default = "default_moto_score")]
    pub moto: f64,
    #[serde(default = "default_car_score")]
    pub car: f64,
    #[serde(default = "default_van_score")]
    pub van: f64,
    #[serde(default = "default_truck_score")]
    pub truck: f64,
}

impl Default for VehicleScores {
    fn default() -> Self {
        Self {
            bike: default_bike_score(),
            moto: default_moto_score(),
            car: default_car_score(),
            van: default_van_score(),
            truck: default_truck_score(),
        }
    }
}

impl VehicleScores {
    pub fn score_for(&self, vehicle: VehicleType) -> f64 {
        match vehicle {
            VehicleType::Bike => self.bike,
            VehicleType::Moto => self.moto,
            VehicleType::Car => self.car,
            VehicleType::Van => self.van,
            VehicleType::Truck => self.truck,
        }
    }
}

fn default_bike_score() -> f64 { 0.1 }
fn default_moto_score() -> f64 { 0.3 }
fn default_car_score() -> f64 { 0.8 }
fn default_van_score() -> f64 { 0.9 }
fn default_truck_score() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with COURIER__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., COURIER__RANKING__DEFAULT_TOP_K -> ranking.default_top_k
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Parse settings from an in-memory TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("COURIER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
