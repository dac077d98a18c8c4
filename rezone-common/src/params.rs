//! Zoning parameter model and validation
//!
//! A rezoning run is controlled by three user-chosen parameters: how far
//! to look for nearby buildings, which statistic of their heights to use
//! as the reference, and how much to scale that reference by. Parameter
//! validation happens at every boundary that accepts user input (API
//! handler, simulator CLI); the engine assumes validated parameters.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default neighbor search radius in meters
pub const DEFAULT_DISTANCE_M: f64 = 10.0;

/// Default reference-height multiplier
pub const DEFAULT_HEIGHT_MULTIPLE: f64 = 1.3;

/// Upper bound on the neighbor search radius in meters
pub const MAX_DISTANCE_M: f64 = 200.0;

/// Statistic applied to nearby building heights to derive the
/// reference height for a parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightStat {
    /// Tallest nearby building
    #[default]
    Max,
    /// Arithmetic mean of nearby building heights
    Mean,
    /// Interpolated median of nearby building heights
    Median,
}

impl HeightStat {
    /// Wire name used in query strings and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            HeightStat::Max => "max",
            HeightStat::Mean => "mean",
            HeightStat::Median => "median",
        }
    }
}

impl fmt::Display for HeightStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeightStat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(HeightStat::Max),
            "mean" => Ok(HeightStat::Mean),
            "median" => Ok(HeightStat::Median),
            other => Err(Error::InvalidInput(format!(
                "Local height must be max, mean, or median (got \"{}\")",
                other
            ))),
        }
    }
}

/// Parameters for a contextual rezoning run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoningParams {
    /// Neighbor search radius in meters
    pub distance_m: f64,
    /// Multiplier applied to the reference height
    pub height_multiple: f64,
    /// Statistic used to derive the reference height
    pub height_stat: HeightStat,
}

impl Default for ZoningParams {
    fn default() -> Self {
        Self {
            distance_m: DEFAULT_DISTANCE_M,
            height_multiple: DEFAULT_HEIGHT_MULTIPLE,
            height_stat: HeightStat::default(),
        }
    }
}

impl ZoningParams {
    /// Validate user-supplied parameter values
    pub fn validate(&self) -> Result<()> {
        if !self.distance_m.is_finite() {
            return Err(Error::InvalidInput("Distance must be a number".to_string()));
        }
        if self.distance_m <= 0.0 || self.distance_m > MAX_DISTANCE_M {
            return Err(Error::InvalidInput(
                "Distance must be between 0 and 200 meters".to_string(),
            ));
        }
        if !self.height_multiple.is_finite() || self.height_multiple <= 0.0 {
            return Err(Error::InvalidInput(
                "Height multiple must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
