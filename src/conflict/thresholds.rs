use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::aircraft::{AlertLevel, Category};

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("distance bounds must be finite (low {low}, medium {medium}, high {high})")]
    NotFinite { low: f64, medium: f64, high: f64 },
    #[error("distance bounds must satisfy low > medium > high >= 0 (low {low}, medium {medium}, high {high})")]
    Unordered { low: f64, medium: f64, high: f64 },
}

#[derive(Deserialize)]
struct RawBands {
    low: f64,
    medium: f64,
    high: f64,
}

/// Distance bounds in meters for one category. A smaller bound maps to a
/// stricter severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawBands")]
pub struct DistanceBands {
    low: f64,
    medium: f64,
    high: f64,
}

impl DistanceBands {
    pub fn new(low: f64, medium: f64, high: f64) -> Result<Self, ThresholdError> {
        if !(low.is_finite() && medium.is_finite() && high.is_finite()) {
            return Err(ThresholdError::NotFinite { low, medium, high });
        }
        if !(low > medium && medium > high && high >= 0.0) {
            return Err(ThresholdError::Unordered { low, medium, high });
        }
        Ok(Self { low, medium, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Severity for a separation, checking the nearest bound first.
    /// `None` means the pair is not in conflict.
    pub fn severity(&self, distance_m: f64) -> Option<AlertLevel> {
        if distance_m <= self.high {
            Some(AlertLevel::Alarm)
        } else if distance_m <= self.medium {
            Some(AlertLevel::Alert)
        } else if distance_m <= self.low {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }
}

impl TryFrom<RawBands> for DistanceBands {
    type Error = ThresholdError;

    fn try_from(raw: RawBands) -> Result<Self, Self::Error> {
        DistanceBands::new(raw.low, raw.medium, raw.high)
    }
}

/// Per-category distance bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThresholdTable {
    #[serde(rename = "Ground-Ground")]
    pub ground_ground: DistanceBands,
    #[serde(rename = "Air-Air")]
    pub air_air: DistanceBands,
    #[serde(rename = "Air-Ground")]
    pub air_ground: DistanceBands,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            ground_ground: DistanceBands {
                low: 15.0,
                medium: 8.0,
                high: 5.0,
            },
            air_air: DistanceBands {
                low: 300.0,
                medium: 250.0,
                high: 200.0,
            },
            air_ground: DistanceBands {
                low: 200.0,
                medium: 150.0,
                high: 100.0,
            },
        }
    }
}

impl ThresholdTable {
    pub fn bands(&self, category: Category) -> &DistanceBands {
        match category {
            Category::GroundGround => &self.ground_ground,
            Category::AirAir => &self.air_air,
            Category::AirGround => &self.air_ground,
        }
    }
}
